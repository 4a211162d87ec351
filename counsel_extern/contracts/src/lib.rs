pub mod cms;
pub mod crm;
