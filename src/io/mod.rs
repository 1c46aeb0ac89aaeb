//! Reading centerlines and writing tube meshes.
use crate::*;
use byteorder::*;
use std::io::{Cursor, Write};

pub mod centerline;
pub mod stl;

/// Result for decoding byte formats.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
