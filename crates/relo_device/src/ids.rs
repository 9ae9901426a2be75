//! Opaque ID newtypes for device grid entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. IDs are dense and assigned in load order.

relo_common::define_id!(
    /// Opaque, copyable ID for a tile in the device grid.
    TileId
);

relo_common::define_id!(
    /// Opaque, copyable ID for a primitive site (placement location).
    SiteId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        let id = SiteId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn tile_and_site_ids_are_distinct_types() {
        let tile = TileId::from_raw(1);
        let site = SiteId::from_raw(1);
        assert_eq!(tile.as_raw(), site.as_raw());
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = TileId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: TileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
