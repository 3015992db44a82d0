//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod accessibility_tag;
pub mod comment;
pub mod favorite;
pub mod game;
pub mod genre;
mod id_set;
pub mod platform;
pub mod proposal;
pub mod user;

pub use id_set::IdSet;
pub use proposal::ProposalState;

// Re-export specific types to avoid conflicts
pub use accessibility_tag::{
    Column as AccessibilityTagColumn, Entity as AccessibilityTag,
    Model as AccessibilityTagModel,
};
pub use comment::{Column as CommentColumn, Entity as Comment, Model as CommentModel};
pub use favorite::{Column as FavoriteColumn, Entity as Favorite, Model as FavoriteModel};
pub use game::{Column as GameColumn, Entity as Game, Model as GameModel};
pub use genre::{Column as GenreColumn, Entity as Genre, Model as GenreModel};
pub use platform::{Column as PlatformColumn, Entity as Platform, Model as PlatformModel};
pub use proposal::{Column as ProposalColumn, Entity as Proposal, Model as ProposalModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
