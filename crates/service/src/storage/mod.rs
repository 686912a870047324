//! Storage primitives shared by service modules.
//! Currently a JSON-file-backed ordered map used by the line store.

pub mod json_map_store;
