pub use super::artifacts::Entity as Artifacts;
pub use super::backlog_entries::Entity as BacklogEntries;
pub use super::backlogs::Entity as Backlogs;
pub use super::genre_map::Entity as GenreMap;
pub use super::genres::Entity as Genres;
pub use super::links::Entity as Links;
pub use super::ratings::Entity as Ratings;
pub use super::user_states::Entity as UserStates;
pub use super::users::Entity as Users;
pub use super::wishlist_overrides::Entity as WishlistOverrides;
