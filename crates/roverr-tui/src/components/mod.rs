pub mod delete_dialog;
pub mod header;
pub mod help_overlay;
pub mod identify_prompt;
pub mod movie_detail;
pub mod movie_grid;
pub mod settings_view;
pub mod torrent_table;
