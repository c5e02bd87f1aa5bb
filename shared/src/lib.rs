//! AWS wiring shared by the lambdas: clients, configuration, admin sessions, asset storage
//! and the contact mailer.

pub mod auth;
pub mod config;
pub mod contact;
pub mod email;
pub mod storage;

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sesv2::Client as SesClient;
use paperworks_atoms::media::UploadGateway;
use paperworks_atoms::products::DynamoProductStore;

pub use config::Config;
pub use storage::S3Storage;

pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub s3_client: S3Client,
    pub ses_client: SesClient,
    pub config: Config,
    pub product_store: DynamoProductStore,
    pub gateway: UploadGateway<S3Storage>,
}

impl AppState {
    pub fn new(sdk_config: &aws_config::SdkConfig, config: Config) -> Self {
        let dynamo_client = DynamoClient::new(sdk_config);
        let s3_client = S3Client::new(sdk_config);
        let ses_client = SesClient::new(sdk_config);

        let product_store = DynamoProductStore::new(dynamo_client.clone(), config.table_name.clone());
        let storage = S3Storage::new(
            s3_client.clone(),
            config.bucket_name.clone(),
            config.public_asset_base_url.clone(),
            config.upload_url_ttl_secs,
        );
        let gateway = UploadGateway::new(storage).with_max_bytes(config.max_upload_bytes);

        Self {
            dynamo_client,
            s3_client,
            ses_client,
            config,
            product_store,
            gateway,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }
}
