pub mod backup;
pub mod export;
pub mod import;
pub mod parser;
pub mod sniff;

// Re-export main functions for convenience
pub use backup::{decode_backup, encode_backup, BackupEnvelope, DecodedBackup};
pub use export::{export_bookmarks, export_to_format, generate_bookmarks_html, ExportFormat};
pub use import::{import_backup, import_bookmarks, import_from_file, import_interchange, ImportReport, ImportStats};
pub use parser::{parse_bookmarks_html, ParsedBookmark};
pub use sniff::ImportFormat;
