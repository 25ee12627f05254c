pub mod inputs;
pub mod outputs;
pub mod qr_code;
pub mod storage;
pub mod upload_service;
pub mod url_resolver;
