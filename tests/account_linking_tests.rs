mod common;

use meroshare_backend::entities::accounts::AccountStatus;
use meroshare_backend::error::{LinkError, PlatformError, StoreError};
use meroshare_backend::models::account::CreateAccountRequest;
use meroshare_backend::services::account_linking::AccountLinkingService;
use meroshare_backend::services::store::AccountStore;
use meroshare_backend::services::store_memory::MemoryStore;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::{MockPlatform, SharedPlatform, client, spawn_platform};

async fn setup(platform: MockPlatform) -> (AccountLinkingService, Arc<MemoryStore>, SharedPlatform) {
    let (base_url, platform) = spawn_platform(platform).await;
    let store = Arc::new(MemoryStore::new());
    let service = AccountLinkingService::new(client(&base_url), store.clone());
    (service, store, platform)
}

fn request(username: &str) -> CreateAccountRequest {
    CreateAccountRequest {
        client_id: 128,
        username: username.to_string(),
        password: "secret".to_string(),
        bank_id: "54".to_string(),
        crn_number: "SNMAR001030199".to_string(),
        transaction_pin: "1997".to_string(),
        preferred_kitta: 20,
    }
}

#[tokio::test]
async fn test_link_account_persists_merged_record() {
    let (service, store, platform) = setup(MockPlatform::default()).await;
    let user_id = Uuid::new_v4();

    let account_id = service.link_account(user_id, request("01737395")).await.unwrap();

    let account = store.get_account(account_id).await.unwrap().unwrap();
    assert_eq!(account.user_id, user_id);
    assert_eq!(account.status, AccountStatus::Active);
    assert_eq!(account.name, "Sita Sharma");
    assert_eq!(account.demat, "1301580001737395");
    assert_eq!(account.dmat_expiry_date, "2084-01-01");
    assert_eq!(account.account_number, "023011060008386");
    assert_eq!(account.customer_id, 6050709);
    assert_eq!(account.account_branch_id, 4117);
    assert_eq!(account.preferred_kitta, 20);
    assert_eq!(account.transaction_pin, "1997");
    assert_eq!(platform.lock().login_calls, 1);
}

#[tokio::test]
async fn test_failed_login_is_unauthenticated() {
    let (service, store, _platform) = setup(MockPlatform {
        login_status: 401,
        ..Default::default()
    })
    .await;

    let result = service.link_account(Uuid::new_v4(), request("01737395")).await;

    assert!(matches!(result, Err(LinkError::Unauthenticated)));
    assert!(store.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_platform_outage_on_login_is_unauthenticated() {
    let (service, _store, _platform) = setup(MockPlatform {
        login_status: 502,
        ..Default::default()
    })
    .await;

    let result = service.link_account(Uuid::new_v4(), request("01737395")).await;

    assert!(matches!(result, Err(LinkError::Unauthenticated)));
}

#[tokio::test]
async fn test_empty_bank_details_is_rejected() {
    let (service, store, _platform) = setup(MockPlatform {
        bank_records: Vec::new(),
        ..Default::default()
    })
    .await;

    let result = service.link_account(Uuid::new_v4(), request("01737395")).await;

    assert!(matches!(result, Err(LinkError::NoBankRecord)));
    assert!(store.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_own_details_failure_persists_nothing() {
    let (service, store, _platform) = setup(MockPlatform {
        own_details_status: 500,
        ..Default::default()
    })
    .await;

    let result = service.link_account(Uuid::new_v4(), request("01737395")).await;

    assert!(matches!(
        result,
        Err(LinkError::Platform(PlatformError::FetchFailed { status: 500, .. }))
    ));
    assert!(store.list_accounts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_linking_same_username_twice_is_duplicate() {
    let (service, store, _platform) = setup(MockPlatform::default()).await;
    let user_id = Uuid::new_v4();

    service.link_account(user_id, request("01737395")).await.unwrap();
    let result = service.link_account(user_id, request("01737395")).await;

    assert!(matches!(result, Err(LinkError::Store(StoreError::Duplicate(_)))));
    assert_eq!(store.list_accounts_by_user(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_username_can_be_linked_again_after_delete() {
    let (service, store, _platform) = setup(MockPlatform::default()).await;
    let user_id = Uuid::new_v4();

    let first_id = service.link_account(user_id, request("01737395")).await.unwrap();
    store.delete_account(first_id).await.unwrap();

    let second_id = service.link_account(user_id, request("01737395")).await.unwrap();

    assert_ne!(first_id, second_id);
    let accounts = store.list_accounts_by_user(user_id).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, second_id);
    assert!(store.account(first_id).unwrap().deleted_at.is_some());
}
