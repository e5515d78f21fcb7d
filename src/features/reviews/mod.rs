//! Beverage reviews.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/reviews` | Review list page |
//! | POST | `/reviews/ui/{view_id}/events` | Review list page events |
//! | GET | `/api/reviews` | List reviews (search, paginated) |
//! | POST | `/api/reviews` | Create a review |
//! | GET | `/api/reviews/{id}` | Get a review |
//! | PUT | `/api/reviews/{id}` | Update a review |
//! | DELETE | `/api/reviews/{id}` | Delete a review |

pub mod dtos;
pub mod editor;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod view;

pub use services::ReviewService;
