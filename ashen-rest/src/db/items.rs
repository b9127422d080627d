//! Item queries

use ashen_common::models::{Item, NewItem};
use ashen_common::Result;
use sqlx::SqlitePool;

pub async fn list_items(pool: &SqlitePool) -> Result<Vec<Item>> {
    let rows = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, type FROM items ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, item_type)| Item { id, name, item_type })
        .collect())
}

pub async fn get_item(pool: &SqlitePool, id: i64) -> Result<Option<Item>> {
    let row = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, type FROM items WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, item_type)| Item { id, name, item_type }))
}

pub async fn insert_item(pool: &SqlitePool, new: &NewItem) -> Result<Item> {
    let result = sqlx::query("INSERT INTO items (name, type) VALUES (?, ?)")
        .bind(&new.name)
        .bind(&new.item_type)
        .execute(pool)
        .await?;

    Ok(Item {
        id: result.last_insert_rowid(),
        name: new.name.clone(),
        item_type: new.item_type.clone(),
    })
}
