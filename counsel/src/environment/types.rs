use counsel_core_contact_impl::ContactFeatureServiceImpl;
use counsel_core_news_impl::NewsFeatureServiceImpl;
use counsel_extern_impl::{cms::CmsApiServiceImpl, crm::CrmApiServiceImpl};
use counsel_shared_impl::time::TimeServiceImpl;

// API
pub type RestServer = counsel_api_rest::RestServer<ContactFeature, NewsFeature>;

// Extern
pub type CrmApi = CrmApiServiceImpl;
pub type CmsApi = CmsApiServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Time, CrmApi>;
pub type NewsFeature = NewsFeatureServiceImpl<CmsApi>;
