use bcrypt::{hash, verify, DEFAULT_COST};
use futures_util::StreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Database;

use crate::error::{Result, ServiceError};

pub fn hash_password(plaintext: &str) -> Result<String> {
    hash(plaintext, DEFAULT_COST).map_err(|e| ServiceError::Store(e.to_string()))
}

pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    verify(plaintext, digest).unwrap_or(false)
}

/// A stored secret that never went through bcrypt (no `$2` prefix).
pub fn is_legacy_digest(stored: &str) -> bool {
    !stored.starts_with("$2")
}

/// One-time cleanup for rows created before hashing was enforced: re-hash
/// any stored secret that is still plaintext. Idempotent (already-hashed
/// rows are skipped), intended to run from the bootstrap binary only —
/// never on a login path. Returns how many rows were rewritten.
pub async fn migrate_legacy_digests(db: &Database) -> Result<u64> {
    let mut migrated = 0;

    for name in ["investors", "agents"] {
        let col = db.collection::<Document>(name);

        let mut cursor = col
            .find(doc! { "password_hash": { "$not": { "$regex": "^\\$2" } } }, None)
            .await?;

        while let Some(row) = cursor.next().await {
            let row = row?;
            let id = row
                .get_object_id("_id")
                .map_err(|e| ServiceError::Store(e.to_string()))?;
            let plain = row
                .get_str("password_hash")
                .map_err(|e| ServiceError::Store(e.to_string()))?;

            let digest = hash_password(plain)?;
            col.update_one(
                doc! { "_id": id },
                doc! { "$set": { "password_hash": digest } },
                None,
            )
            .await?;
            migrated += 1;
        }
    }

    Ok(migrated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let digest = hash_password("secret1").unwrap();
        assert!(digest.starts_with("$2"));
        assert!(verify_password("secret1", &digest));
        assert!(!verify_password("secret2", &digest));
    }

    #[test]
    fn legacy_digest_detection() {
        assert!(is_legacy_digest("secret1"));
        assert!(is_legacy_digest(""));
        assert!(!is_legacy_digest(
            "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW"
        ));
    }

    #[test]
    fn verify_tolerates_malformed_digest() {
        // never panics on a digest this service did not produce
        assert!(!verify_password("secret1", "not-a-bcrypt-digest"));
    }
}
