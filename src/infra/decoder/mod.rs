pub mod spreadsheet_decoder;
