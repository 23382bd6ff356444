use serde_json::json;
use std::sync::Arc;
use walletkit_api::{ApiClient, ApiConfig};
use walletkit_ethereum::{
    fetch_token_list, Erc20Adapter, EthereumAdapter, EthereumClient, EthereumConfig,
};
use walletkit_traits::{Adapter, Amount, TransactionDirection};
use wiremock::matchers::{body_json, method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";
const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

fn shared_client(server: &MockServer) -> Arc<EthereumClient> {
    Arc::new(EthereumClient::new(&EthereumConfig::new(server.uri()), KEY).unwrap())
}

#[tokio::test]
async fn native_balance_is_wei_at_18_decimals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/account/0x[0-9a-f]{40}/balance$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"balance": "2000000000000000000"})),
        )
        .mount(&server)
        .await;

    let adapter = EthereumAdapter::new(shared_client(&server));
    let balance = adapter.balance().await.unwrap();
    assert_eq!(balance, Amount::from_smallest_unit(2_000_000_000_000_000_000, 18));
}

#[tokio::test]
async fn token_balance_is_scoped_to_contract_and_precision() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(&format!(
            r"^/account/0x[0-9a-f]{{40}}/erc20/{USDT}/balance$"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": "2500000"})))
        .mount(&server)
        .await;

    let adapter = Erc20Adapter::new(shared_client(&server), USDT, 6)
        .unwrap()
        .with_code("USDT");
    let balance = adapter.balance().await.unwrap();
    assert_eq!(balance, Amount::from_smallest_unit(2_500_000, 6));
}

#[tokio::test]
async fn token_history_is_paged_and_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(&format!(
            r"^/account/0x[0-9a-f]{{40}}/erc20/{USDT}/transactions$"
        )))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "hash": "0xfeed",
            "direction": "incoming",
            "amount": "1000000",
            "counterparty": "0x0000000000000000000000000000000000000001",
            "timestamp": 1700000000u64,
            "confirmed": true
        }])))
        .mount(&server)
        .await;

    let adapter = Erc20Adapter::new(shared_client(&server), USDT, 6).unwrap();
    let page = adapter.transactions(None, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].direction, TransactionDirection::Incoming);
    assert_eq!(page[0].amount.decimals, 6);
}

#[tokio::test]
async fn token_send_posts_through_contract_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(&format!(
            r"^/account/0x[0-9a-f]{{40}}/erc20/{USDT}/transactions$"
        )))
        .and(body_json(json!({
            "to": "0x0000000000000000000000000000000000000001",
            "amount": "1000000",
            "gas_price": 25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hash": "0xsent"})))
        .mount(&server)
        .await;

    let adapter = Erc20Adapter::new(shared_client(&server), USDT, 6).unwrap();
    let hash = adapter
        .send(
            "0x0000000000000000000000000000000000000001",
            Amount::from_smallest_unit(1_000_000, 6),
            25,
        )
        .await
        .unwrap();
    assert_eq!(hash.as_str(), "0xsent");
}

#[tokio::test]
async fn token_directory_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/blockchain/ETH/erc20/index\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"code": "USDT", "name": "Tether USD", "contract": USDT, "decimal": 6},
            {"code": "DAI", "name": "Dai Stablecoin",
             "contract": "0x6B175474E89094C44Da98b954EedeAC495271d0F", "decimal": 18}
        ])))
        .mount(&server)
        .await;

    let api = ApiClient::new(ApiConfig::new(server.uri())).unwrap();
    let tokens = fetch_token_list(&api).await.unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].code, "USDT");
    assert_eq!(tokens[1].decimal, 18);
}
