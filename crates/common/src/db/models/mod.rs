//! SeaORM entity models
//!
//! Database entities for PaperClub

mod paper;
mod user;
mod tag_name;
mod tag;
mod like;

pub use user::{
    Entity as UserEntity,
    Model as User,
    ActiveModel as UserActiveModel,
    Column as UserColumn,
};

pub use paper::{
    Entity as PaperEntity,
    Model as Paper,
    ActiveModel as PaperActiveModel,
    Column as PaperColumn,
};

pub use tag_name::{
    Entity as TagNameEntity,
    Model as TagName,
    ActiveModel as TagNameActiveModel,
    Column as TagNameColumn,
};

pub use tag::{
    Entity as TagEntity,
    Model as Tag,
    ActiveModel as TagActiveModel,
    Column as TagColumn,
};

pub use like::{
    Entity as LikeEntity,
    Model as Like,
    ActiveModel as LikeActiveModel,
    Column as LikeColumn,
};
