//! Paper/tag association entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pid: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub tagname: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::paper::Entity",
        from = "Column::Pid",
        to = "super::paper::Column::Pid",
        on_delete = "Cascade"
    )]
    Paper,

    #[sea_orm(
        belongs_to = "super::tag_name::Entity",
        from = "Column::Tagname",
        to = "super::tag_name::Column::Tagname",
        on_delete = "Cascade"
    )]
    TagName,
}

impl Related<super::paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paper.def()
    }
}

impl Related<super::tag_name::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagName.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
