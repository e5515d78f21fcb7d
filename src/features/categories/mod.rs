//! Beverage categories.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/categories` | Category list page |
//! | POST | `/categories/ui/{view_id}/events` | Category list page events |
//! | GET | `/api/categories` | List categories (search, paginated) |
//! | POST | `/api/categories` | Create a category |
//! | GET | `/api/categories/{id}` | Get a category |
//! | PUT | `/api/categories/{id}` | Rename a category |
//! | DELETE | `/api/categories/{id}` | Delete a category, detaching its reviews |

pub mod dtos;
pub mod editor;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod view;

pub use services::CategoryService;
