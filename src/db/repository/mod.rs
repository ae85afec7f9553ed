pub mod families;
pub mod family_members;
pub mod items;
pub mod list_shares;
pub mod lists;

pub use families::FamilyRepository;
pub use family_members::FamilyMemberRepository;
pub use items::ItemRepository;
pub use list_shares::{ListShareRepository, SharedListRow};
pub use lists::ListRepository;
