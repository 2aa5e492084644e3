use sea_orm::entity::prelude::*;

/// Audit trail row. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Acting user, nulled when that user is deleted
    pub user_id: Option<i32>,

    pub action: String,

    pub entity_type: String,

    pub entity_id: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,

    pub ip_address: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entry, attaching the actor's username when it was loaded
    pub fn to_domain_entry(
        self,
        actor: Option<super::user::Model>,
    ) -> crate::core::models::AuditEntry {
        crate::core::models::AuditEntry {
            id: self.id,
            user_id: self.user_id,
            username: actor.map(|u| u.username),
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            details: self.details,
            ip_address: self.ip_address,
            created_at: self.created_at,
        }
    }
}
