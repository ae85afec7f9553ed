//! Database models split into separate files.

pub mod family;
pub mod family_member;
pub mod item;
pub mod list;
pub mod share;

pub use self::family::*;
pub use self::family_member::*;
pub use self::item::*;
pub use self::list::*;
pub use self::share::*;
