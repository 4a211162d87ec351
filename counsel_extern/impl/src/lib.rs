pub mod cms;
pub mod crm;
pub mod http;
