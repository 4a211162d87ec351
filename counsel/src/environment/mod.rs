use anyhow::Context;
use counsel_api_rest::RestServerConfig;
use counsel_config::Config;
use counsel_core_contact_impl::{ContactFeatureConfig, CrmColumnMapping};
use counsel_core_news_impl::NewsFeatureConfig;
use counsel_extern_impl::{
    cms::{CmsApiServiceConfig, CmsApiServiceImpl},
    crm::{CrmApiServiceConfig, CrmApiServiceImpl},
};
use counsel_shared_impl::time::TimeServiceImpl;
use counsel_utils::retry::RetryPolicy;
use types::{ContactFeature, NewsFeature, RestServer};

pub mod types;

/// Service configs derived from the [`Config`], able to assemble the whole
/// service graph.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    // API
    rest_server_config: RestServerConfig,

    // Extern
    crm_api_service_config: CrmApiServiceConfig,
    cms_api_service_config: CmsApiServiceConfig,

    // Core
    contact_feature_config: ContactFeatureConfig,
    news_feature_config: NewsFeatureConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            allowed_origins: config
                .http
                .allowed_origins
                .iter()
                .map(|origin| {
                    origin
                        .parse()
                        .with_context(|| format!("Invalid allowed origin {origin:?}"))
                })
                .collect::<anyhow::Result<_>>()?,
        };

        // Extern
        let crm_api_service_config = CrmApiServiceConfig {
            endpoint: config.crm.endpoint.clone().into(),
            api_token: config.crm.api_token.as_str().into(),
            api_version: config.crm.api_version.as_str().into(),
            board_id: config.crm.board_id.as_str().into(),
            timeout: config.crm.timeout.into(),
        };

        let cms_api_service_config = CmsApiServiceConfig::new(
            &config.cms.endpoint,
            config.cms.api_key.as_str(),
            config.cms.timeout.into(),
        )?;

        // Core
        let columns = &config.crm.columns;
        let contact_feature_config = ContactFeatureConfig {
            intake_email: config.contact.intake_email.as_str().into(),
            firm_name: config.contact.firm_name.as_str().into(),
            columns: CrmColumnMapping {
                first_name: columns.first_name.as_str().into(),
                last_name: columns.last_name.as_str().into(),
                email: columns.email.as_str().into(),
                phone: columns.phone.as_str().into(),
                legal_service: columns.legal_service.as_str().into(),
                message: columns.message.as_str().into(),
            },
            retry: RetryPolicy::new(config.contact.max_retries, config.contact.retry_delay.into()),
        };

        let news_feature_config = NewsFeatureConfig {
            page_size: config.news.page_size,
            retry: RetryPolicy::new(config.news.max_retries, config.news.retry_delay.into()),
        };

        Ok(Self {
            rest_server_config,
            crm_api_service_config,
            cms_api_service_config,
            contact_feature_config,
            news_feature_config,
        })
    }

    pub fn contact_feature(&self) -> ContactFeature {
        ContactFeature::new(
            TimeServiceImpl,
            CrmApiServiceImpl::new(self.crm_api_service_config.clone()),
            self.contact_feature_config.clone(),
        )
    }

    pub fn news_feature(&self) -> NewsFeature {
        NewsFeature::new(
            CmsApiServiceImpl::new(self.cms_api_service_config.clone()),
            self.news_feature_config,
        )
    }

    pub fn rest_server(&self) -> RestServer {
        RestServer::new(
            self.contact_feature(),
            self.news_feature(),
            self.rest_server_config.clone(),
        )
    }
}
