use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A beverage category. `name` is unique and is what users see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// Reviews currently filed under this category (derived on read)
    pub beverage_count: i64,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            beverage_count: 0,
        }
    }

    /// Fresh instance loaded into the editor for ADD.
    pub fn blank() -> Self {
        Self::new(String::new())
    }
}
