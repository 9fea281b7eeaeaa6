use std::fs;
use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(code: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/currencies/{code}.json");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_response = r#"{"date": "2024-03-06", "usd": {"eur": 0.92, "gbp": 0.79}}"#;
    let mock_server = test_utils::create_mock_server("usd", mock_response).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        providers:
          currency_api:
            base_url: {}
        currency: "usd"
    "#,
        mock_server.uri()
    );

    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = fxr::run_command(
        fxr::AppCommand::Rates {
            code: None,
            targets: vec![],
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_with_mock() {
    let mock_response = r#"{"date": "2024-03-06", "usd": {"eur": 0.92}}"#;
    let mock_server = test_utils::create_mock_server("usd", mock_response).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        providers:
          currency_api:
            base_url: {}
        currency: "usd"
    "#,
        mock_server.uri()
    );

    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = fxr::run_command(
        fxr::AppCommand::Convert {
            amount: 100.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_fetcher_issues_one_request_per_code_change() {
    use fxr::fetcher::RateFetcher;
    use fxr::providers::currency_api::CurrencyApiProvider;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currencies/usd.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"date": "2024-03-06", "usd": {"eur": 0.92}}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/currencies/eur.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"date": "2024-03-06", "eur": {"usd": 1.09}}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = Arc::new(CurrencyApiProvider::new(&mock_server.uri()));
    let fetcher = RateFetcher::new(provider);
    let mut rx = fetcher.subscribe();

    fetcher.set("usd").await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().as_ref().unwrap().get("eur"), Some(&0.92));

    // Unchanged code must not hit the server again
    fetcher.set("usd").await;

    fetcher.set("eur").await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().as_ref().unwrap().get("usd"), Some(&1.09));

    // MockServer verifies the expect(1) counts on drop
}

#[test_log::test(tokio::test)]
async fn test_real_currency_api() {
    use fxr::providers::currency_api::{CurrencyApiProvider, DEFAULT_BASE_URL};
    use fxr::rate_provider::CurrencyRatesProvider;

    let provider = CurrencyApiProvider::new(DEFAULT_BASE_URL);

    let code = "usd";
    info!(?code, "Fetching rates from currency-api");

    let result = provider.fetch_rates(code).await;

    match result {
        Ok(Some(rates)) => {
            info!(count = rates.len(), "Received successful rates response");
            assert!(!rates.is_empty(), "Rates should not be empty");
            let eur = rates.get("eur").copied().unwrap_or_default();
            assert!(eur > 0.0, "EUR rate should be positive");

            info!("Real API Response - 1 {} = {} eur", code, eur);
        }
        Ok(None) => {
            panic!("currency-api document unexpectedly lacks the '{code}' key");
        }
        Err(e) => {
            error!("Rates API request failed: {e}\n{e:?}");
            panic!("Rates API request failed: {e}");
        }
    }
}
