//! Character queries

use ashen_common::models::{Character, Item, NewCharacter};
use ashen_common::Result;
use sqlx::SqlitePool;

pub async fn list_characters(pool: &SqlitePool) -> Result<Vec<Character>> {
    let rows = sqlx::query_as::<_, (i64, String, i64)>(
        "SELECT id, name, level FROM characters ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, level)| Character { id, name, level })
        .collect())
}

pub async fn get_character(pool: &SqlitePool, id: i64) -> Result<Option<Character>> {
    let row = sqlx::query_as::<_, (i64, String, i64)>(
        "SELECT id, name, level FROM characters WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, level)| Character { id, name, level }))
}

/// Insert a validated character and return it with its new id
pub async fn insert_character(pool: &SqlitePool, new: &NewCharacter) -> Result<Character> {
    let name = new.name.trim();
    let result = sqlx::query("INSERT INTO characters (name, level) VALUES (?, ?)")
        .bind(name)
        .bind(new.level)
        .execute(pool)
        .await?;

    Ok(Character {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        level: new.level,
    })
}

pub async fn items_for_character(pool: &SqlitePool, character_id: i64) -> Result<Vec<Item>> {
    let rows = sqlx::query_as::<_, (i64, String, String)>(
        r#"
        SELECT items.id, items.name, items.type
        FROM items
        INNER JOIN character_items ON items.id = character_items.item_id
        WHERE character_items.character_id = ?
        ORDER BY items.id
        "#,
    )
    .bind(character_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, item_type)| Item { id, name, item_type })
        .collect())
}

/// Attach an item to a character
///
/// Re-adding an item the character already holds is a no-op.
/// Returns whether a new association was created.
pub async fn add_item_to_character(
    pool: &SqlitePool,
    character_id: i64,
    item_id: i64,
) -> Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO character_items (character_id, item_id) VALUES (?, ?)",
    )
    .bind(character_id)
    .bind(item_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
