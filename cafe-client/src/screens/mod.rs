// cafe-client/src/screens/mod.rs
// 页面状态: 列表视图与表单

pub mod contacts;
pub mod forms;
pub mod list;
pub mod menu;
pub mod products;
pub mod reservations;

pub use contacts::{ContactFilter, ContactsScreen};
pub use list::{ListSource, ListState, ListView};
pub use menu::{MenuScreen, MenuSection};
pub use products::{ProductFilter, ProductsScreen};
pub use reservations::{ReservationFilter, ReservationsScreen};
