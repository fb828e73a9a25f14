/// Column order of the backing table. Every file must start with exactly this header.
pub(crate) const COLUMNS: [&str; 5] = ["Date", "Description", "Amount", "Type", "Category"];

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
