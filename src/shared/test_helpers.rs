#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::features::categories::models::Category;
#[cfg(test)]
use crate::features::reviews::models::Review;
#[cfg(test)]
use crate::features::AppServices;
#[cfg(test)]
use crate::modules::storage::MemoryStorage;

/// Services over an empty in-memory store
#[cfg(test)]
pub fn memory_services() -> AppServices {
    AppServices::new(Arc::new(MemoryStorage::new()))
}

/// A valid review ready to be saved
#[cfg(test)]
pub fn sample_review(name: &str, category: Option<Category>) -> Review {
    Review {
        name: name.to_string(),
        score: 4,
        count: 1,
        category,
        ..Review::blank()
    }
}
