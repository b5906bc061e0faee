pub const INPUT_TITLE: &str = " Search ";
pub const RESULTS_TITLE: &str = " Results ";
pub const INPUT_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
pub const HELP_TEXT: &str = "Esc quit · PgUp/PgDn scroll · Ctrl-U clear";
pub const RESULTS_PAGE: u16 = 10;
