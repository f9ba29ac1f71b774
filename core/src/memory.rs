/// Single-slot storage for the ids of the last start points.
pub trait PointMemory {
    fn remembered_ids(&self) -> Vec<String>;
    fn remember(&mut self, ids: &[String]);
    fn forget(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemoryPointMemory {
    ids: Option<Vec<String>>,
}

impl InMemoryPointMemory {
    pub fn with_ids(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            ids: Some(ids.into_iter().map(Into::into).collect()),
        }
    }
}

impl PointMemory for InMemoryPointMemory {
    fn remembered_ids(&self) -> Vec<String> {
        self.ids.clone().unwrap_or_default()
    }

    fn remember(&mut self, ids: &[String]) {
        self.ids = Some(ids.to_vec());
    }

    fn forget(&mut self) {
        self.ids = None;
    }
}

impl<M: PointMemory + ?Sized> PointMemory for &mut M {
    fn remembered_ids(&self) -> Vec<String> {
        (**self).remembered_ids()
    }

    fn remember(&mut self, ids: &[String]) {
        (**self).remember(ids)
    }

    fn forget(&mut self) {
        (**self).forget()
    }
}
