use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Statement, TransactionTrait,
};
use tracing::debug;

use crate::errors::{LinkVaultError, Result};
use crate::storage::models::{BatchCreation, DeleteRequest, Link, LinkCreation, StoreStats};

use migration::entities::link;

use super::converters::{link_to_active_model, model_to_link};

/// Insert one row guarded by the unique index on `original_url`.
/// A conflicting row must not abort an enclosing transaction, so the
/// insert carries `ON CONFLICT DO NOTHING` and the rejection surfaces
/// as `AlreadyExists` for the caller to compensate.
async fn insert_guarded<C: ConnectionTrait>(conn: &C, stored: &Link, owner_id: &str) -> Result<()> {
    let active_model = link_to_active_model(stored, owner_id);

    let result = link::Entity::insert(active_model)
        .on_conflict(
            OnConflict::column(link::Column::OriginalUrl)
                .do_nothing()
                .to_owned(),
        )
        .exec(conn)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(DbErr::RecordNotInserted) => {
            Err(LinkVaultError::already_exists(stored.original_url.clone()))
        }
        Err(e) => Err(LinkVaultError::database_operation(format!(
            "insert of link '{}' failed: {}",
            stored.short_code, e
        ))),
    }
}

/// Compensating read: recover the row that won the unique constraint.
async fn find_by_url<C: ConnectionTrait>(conn: &C, original_url: &str) -> Result<Option<Link>> {
    let model = link::Entity::find()
        .filter(link::Column::OriginalUrl.eq(original_url))
        .one(conn)
        .await?;
    Ok(model.map(model_to_link))
}

pub async fn create_link(
    db: &DatabaseConnection,
    mut link: Link,
    owner_id: &str,
) -> Result<LinkCreation> {
    link.owner_id = owner_id.to_string();
    link.presence = crate::storage::models::Presence::Present;

    match insert_guarded(db, &link, owner_id).await {
        Ok(()) => Ok(LinkCreation {
            link,
            deduplicated: false,
        }),
        Err(LinkVaultError::AlreadyExists(url)) => {
            let mut existing = find_by_url(db, &url).await?.ok_or_else(|| {
                LinkVaultError::database_operation(format!(
                    "conflicting row for '{}' vanished during compensating read",
                    url
                ))
            })?;
            existing.correlation_id = link.correlation_id;
            debug!("create_link deduplicated to {}", existing.short_code);
            Ok(LinkCreation {
                link: existing,
                deduplicated: true,
            })
        }
        Err(e) => Err(e),
    }
}

/// Batch insert inside one transaction. Content conflicts substitute
/// the stored row at the same position and the transaction still
/// commits; only genuine backend failures roll it back.
pub async fn create_link_batch(
    db: &DatabaseConnection,
    batch: Vec<Link>,
    owner_id: &str,
) -> Result<BatchCreation> {
    let txn = db.begin().await?;
    let mut stored = Vec::with_capacity(batch.len());
    let mut deduplicated = false;

    for mut item in batch {
        item.owner_id = owner_id.to_string();
        item.presence = crate::storage::models::Presence::Present;

        match insert_guarded(&txn, &item, owner_id).await {
            Ok(()) => stored.push(item),
            Err(LinkVaultError::AlreadyExists(url)) => {
                let mut existing = find_by_url(&txn, &url).await?.ok_or_else(|| {
                    LinkVaultError::database_operation(format!(
                        "conflicting row for '{}' vanished during compensating read",
                        url
                    ))
                })?;
                existing.correlation_id = item.correlation_id;
                stored.push(existing);
                deduplicated = true;
            }
            Err(e) => {
                txn.rollback().await.ok();
                return Err(e);
            }
        }
    }

    txn.commit().await?;
    Ok(BatchCreation {
        links: stored,
        deduplicated,
    })
}

pub async fn get_link(db: &DatabaseConnection, short_code: &str) -> Result<Link> {
    match link::Entity::find_by_id(short_code.to_string()).one(db).await? {
        Some(model) => Ok(model_to_link(model)),
        None => Ok(Link::absent()),
    }
}

pub async fn list_by_owner(db: &DatabaseConnection, owner_id: &str) -> Result<Vec<Link>> {
    let models = link::Entity::find()
        .filter(link::Column::OwnerId.eq(owner_id))
        .all(db)
        .await?;
    Ok(models.into_iter().map(model_to_link).collect())
}

/// Soft-delete each pair whose ownership matches. The owner filter is
/// part of the UPDATE itself, so mismatched entries update zero rows
/// and are thereby skipped.
pub async fn mark_deleted(db: &DatabaseConnection, requests: &[DeleteRequest]) -> Result<()> {
    let txn = db.begin().await?;
    for request in requests {
        link::Entity::update_many()
            .col_expr(link::Column::IsDeleted, Expr::value(true))
            .filter(link::Column::ShortCode.eq(request.short_code.as_str()))
            .filter(link::Column::OwnerId.eq(request.owner_id.as_str()))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;
    Ok(())
}

pub async fn stats(db: &DatabaseConnection) -> Result<StoreStats> {
    let url_count = link::Entity::find().count(db).await?;

    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT COUNT(DISTINCT owner_id) AS user_count FROM links",
    );
    let user_count = match db.query_one_raw(stmt).await? {
        Some(row) => row.try_get::<i64>("", "user_count")? as u64,
        None => 0,
    };

    Ok(StoreStats {
        url_count,
        user_count,
    })
}
