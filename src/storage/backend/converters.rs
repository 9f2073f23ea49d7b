use sea_orm::ActiveValue::Set;

use crate::storage::models::{Link, Presence};

use migration::entities::link;

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        short_code: model.short_code,
        original_url: model.original_url,
        correlation_id: model.correlation_id,
        owner_id: model.owner_id,
        is_deleted: model.is_deleted,
        presence: Presence::Present,
    }
}

pub fn link_to_active_model(link: &Link, owner_id: &str) -> link::ActiveModel {
    link::ActiveModel {
        short_code: Set(link.short_code.clone()),
        original_url: Set(link.original_url.clone()),
        correlation_id: Set(link.correlation_id.clone()),
        owner_id: Set(owner_id.to_string()),
        is_deleted: Set(false),
        created_at: Set(chrono::Utc::now()),
    }
}
