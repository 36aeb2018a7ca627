use market_dashboard_wasm::domain::errors::{ApiError, NormalizeError};
use market_dashboard_wasm::domain::market_data::Symbol;
use market_dashboard_wasm::infrastructure::http::dto::{
    AssetStatsDto, CandleDto, DataEnvelope, DefiOverviewDto, FearGreedDto, FundingRoundDto, MoversDto,
    OptimizeResponse, PriceDto,
};
use market_dashboard_wasm::infrastructure::http::normalize::*;

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
    serde_json::from_str(json).expect("valid fixture")
}

#[test]
fn prices_accept_numeric_strings_and_pair_symbols() {
    let envelope: DataEnvelope<PriceDto> = parse(
        r#"{"data":[
            {"symbol":"BTC/USDT","price":"67432.5","change_24h":1.25,"volume_24h_usdt":1.2e9},
            {"symbol":"eth","last":3120.0,"percentage":"-0.8"},
            {"symbol":"SOL"}
        ]}"#,
    );
    let normalized = normalize_prices(envelope.data);

    assert_eq!(normalized.items.len(), 2);
    assert_eq!(normalized.items[0].symbol, Symbol::from("BTC"));
    assert_eq!(normalized.items[0].price.value(), 67432.5);
    assert_eq!(normalized.items[1].symbol, Symbol::from("ETH"));
    assert_eq!(normalized.items[1].change_24h, Some(-0.8));
    assert_eq!(normalized.items[1].volume_24h, None);
    assert_eq!(normalized.rejected, vec![(2, NormalizeError::MissingField("price"))]);
}

#[test]
fn every_record_rejected_is_a_validation_error() {
    let records: Vec<PriceDto> = parse(r#"[{"symbol":"BTC","price":"n/a"}]"#);
    let result = normalize_prices(records).into_items("prices");
    assert_eq!(result, Err(ApiError::Validation(NormalizeError::NonFinite("price"))));
}

#[test]
fn empty_response_is_not_an_error() {
    assert_eq!(normalize_prices(Vec::new()).into_items("prices"), Ok(Vec::new()));
}

#[test]
fn candles_are_sorted_and_epochs_become_labels() {
    let records: Vec<CandleDto> = parse(
        r#"[
            {"timestamp":1709652600,"open":2,"high":3,"low":1,"close":2.5,"volume":10},
            {"timestamp":1709649000,"open":1,"high":2,"low":0.5,"close":2},
            {"timestamp":1709656200,"open":"NaN","high":3,"low":1,"close":2}
        ]"#,
    );
    let normalized = normalize_candles(records);

    let times: Vec<&str> = normalized.items.iter().map(|c| c.time.as_str()).collect();
    assert_eq!(times, vec!["1709649000", "1709652600"]);
    assert_eq!(normalized.rejected_count(), 1);
    assert_eq!(normalized.rejected[0], (2, NormalizeError::NonFinite("open")));
}

#[test]
fn fear_greed_falls_back_to_newest_history_point() {
    let dto: FearGreedDto = parse(
        r#"{"data":[
            {"value":"72","value_classification":"Greed","timestamp":"1709649000"},
            {"value":40,"classification":"Fear","timestamp":1709562600}
        ]}"#,
    );
    let index = normalize_fear_greed(dto).expect("index");

    let current = index.current.as_ref().expect("current");
    assert_eq!(current.value, 72);
    assert_eq!(current.label, "Greed");
    assert_eq!(index.history.len(), 2);
    assert_eq!(index.trend(), Some(32));
}

#[test]
fn out_of_range_fear_greed_is_rejected() {
    let dto: FearGreedDto = parse(r#"{"current":{"value":140,"label":"?"}}"#);
    assert!(matches!(
        normalize_fear_greed(dto),
        Err(ApiError::Validation(NormalizeError::Invalid { field: "value", .. }))
    ));
}

#[test]
fn defi_requires_total_tvl() {
    let dto: DefiOverviewDto = parse(
        r#"{"total_tvl_usd":9.1e10,"total_tvl_formatted":"$91.0B",
            "top_protocols":[{"name":"Lido","tvl":3.1e10,"change_1d":0.4,"chains":["Ethereum"]},
                             {"name":"","tvl":1}]}"#,
    );
    let overview = normalize_defi(dto).expect("overview");
    assert_eq!(overview.total_tvl_formatted.as_deref(), Some("$91.0B"));
    assert_eq!(overview.top_protocols.len(), 1);
    assert_eq!(overview.top_protocols[0].name, "Lido");

    let dto: DefiOverviewDto = parse(r#"{"top_protocols":[]}"#);
    assert_eq!(
        normalize_defi(dto),
        Err(ApiError::Validation(NormalizeError::MissingField("total_tvl")))
    );
}

#[test]
fn movers_keep_both_sides() {
    let dto: MoversDto = parse(
        r#"{"gainers":[{"symbol":"ONDO/USDT","change":12.5,"price":1.02}],
            "losers":[{"symbol":"PENDLE","change_24h":-7.1,"price":"4.2","volume_24h":5e6}]}"#,
    );
    let movers = normalize_movers(dto).expect("movers");
    assert_eq!(movers.gainers[0].symbol, Symbol::from("ONDO"));
    assert_eq!(movers.losers[0].change_pct, -7.1);
    assert_eq!(movers.losers[0].volume.map(|v| v.value()), Some(5e6));
}

#[test]
fn funding_rounds_scale_millisecond_dates_and_drop_blank_names() {
    let records: Vec<FundingRoundDto> = parse(
        r#"[
            {"name":"Ondo","amount":20,"date":1709649000000,"leadInvestors":["Founders Fund", null, " "]},
            {"project":"Acme","round_type":"Seed","date":1709649000,"investors":["a16z"]},
            {"amount":5}
        ]"#,
    );
    let normalized = normalize_funding(records);

    assert_eq!(normalized.items.len(), 2);
    assert_eq!(normalized.items[0].date, Some(1_709_649_000));
    assert_eq!(normalized.items[0].lead_investors, vec!["Founders Fund".to_string()]);
    assert_eq!(normalized.items[1].round.as_deref(), Some("Seed"));
    assert_eq!(normalized.items[1].amount_musd, None);
    assert_eq!(normalized.rejected, vec![(2, NormalizeError::MissingField("name"))]);
}

#[test]
fn asset_stats_tolerate_missing_figures() {
    let records: Vec<AssetStatsDto> =
        parse(r#"[{"asset":"btc","price":67000,"return_90d":0.31},{"asset":"ETH"}]"#);
    let stats = normalize_asset_stats(records).items;

    assert_eq!(stats[0].asset, Symbol::from("BTC"));
    assert_eq!(stats[0].return_90d, Some(0.31));
    assert_eq!(stats[1].price, None);
    assert_eq!(stats[1].sharpe, None);
}

#[test]
fn allocation_is_ordered_by_weight_with_metrics() {
    let response: OptimizeResponse = parse(
        r#"{"result":{"method":"hrp","weights":{"ETH":0.3,"BTC":0.5,"SOL":0.2},
            "expected_annual_return":0.42,"annual_volatility":"0.55","sharpe_ratio":1.4}}"#,
    );
    let allocation = normalize_allocation(response).expect("allocation");

    let order: Vec<&str> = allocation.weights().iter().map(|w| w.asset.value()).collect();
    assert_eq!(order, vec!["BTC", "ETH", "SOL"]);
    assert!((allocation.total() - 1.0).abs() < 1e-9);
    assert_eq!(allocation.metrics.method.as_deref(), Some("hrp"));
    assert_eq!(allocation.metrics.annual_volatility, Some(0.55));
}

#[test]
fn allocation_without_result_is_rejected() {
    let response: OptimizeResponse = parse(r#"{"error":"optimizer unavailable"}"#);
    assert_eq!(
        normalize_allocation(response),
        Err(ApiError::Validation(NormalizeError::MissingField("result")))
    );

    let response: OptimizeResponse = parse(r#"{"result":{"weights":{"BTC":-0.2}}}"#);
    assert!(matches!(
        normalize_allocation(response),
        Err(ApiError::Validation(NormalizeError::Invalid { field: "weight", .. }))
    ));
}
