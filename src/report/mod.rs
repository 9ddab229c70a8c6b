//! Report generation for computed dashboard snapshots.

pub mod generator;

pub use generator::{
    generate_json_report, generate_markdown_report, write_json_report, write_report,
};
