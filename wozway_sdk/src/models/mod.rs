mod security;

pub use security::Security;
