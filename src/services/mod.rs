pub mod timeline_api;
