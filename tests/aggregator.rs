use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use pricefold_rs::market_data::types::{PriceRecord, SearchMatch, TokenInfoRecord};
use pricefold_rs::market_data::{Aggregator, Capabilities, Provider, Routes, SharedProvider};

const PEPE: &str = "0x6982508145454Ce325dDbE47a25d4ec3d2311933";

#[derive(Clone, Copy)]
enum Behaviour {
    Miss,
    Answer(f64),
    Panic,
}

/// In-memory provider with scripted answers and call counters.
struct Mock {
    name: &'static str,
    caps: Capabilities,
    behaviour: Behaviour,
    hits: Vec<SearchMatch>,
    calls: AtomicUsize,
}

impl Mock {
    fn new(name: &'static str, caps: Capabilities, behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self { name, caps, behaviour, hits: Vec::new(), calls: AtomicUsize::new(0) })
    }

    fn searching(name: &'static str, behaviour: Behaviour, hits: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            name,
            caps: Capabilities::symbols().with_search(),
            behaviour,
            hits: hits
                .iter()
                .map(|(symbol, id)| SearchMatch::new(format!("{} via {}", symbol, name), *symbol, name).with_id(*id))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, query: &str) -> Option<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Miss => None,
            Behaviour::Answer(p) => Some(p),
            Behaviour::Panic => panic!("{} blew up on {}", self.name, query),
        }
    }
}

#[async_trait]
impl Provider for Mock {
    fn name(&self) -> &str {
        self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    async fn search(&self, query: &str) -> Vec<SearchMatch> {
        self.answer(query);
        self.hits.clone()
    }

    async fn price(&self, query: &str, _network: Option<&str>) -> Option<PriceRecord> {
        let price = self.answer(query)?;
        PriceRecord::new(query, price, self.name).ok()
    }

    async fn token_info(&self, query: &str, _network: Option<&str>) -> Option<TokenInfoRecord> {
        let price = self.answer(query)?;
        TokenInfoRecord::new(query, query, price, self.name).ok()
    }
}

fn shared(m: &Arc<Mock>) -> SharedProvider {
    m.clone()
}

#[tokio::test]
async fn price_falls_back_and_stops_at_first_answer() {
    let a = Mock::new("A", Capabilities::symbols(), Behaviour::Miss);
    let b = Mock::new("B", Capabilities::symbols(), Behaviour::Miss);
    let c = Mock::new("C", Capabilities::symbols(), Behaviour::Answer(1.5));
    let d = Mock::new("D", Capabilities::symbols(), Behaviour::Answer(9.0));
    let agg = Aggregator::with_providers(vec![shared(&a), shared(&b), shared(&c), shared(&d)]);

    let rec = agg.price("ETH", None).await.expect("C answers");
    assert_eq!(rec.source(), "C");
    assert_eq!(rec.price_usd(), 1.5);
    assert_eq!((a.calls(), b.calls(), c.calls(), d.calls()), (1, 1, 1, 0));

    let info = agg.info("ETH", None).await.expect("C answers");
    assert_eq!(info.source(), "C");
    assert_eq!(d.calls(), 0);
}

#[tokio::test]
async fn total_failure_is_none_not_error() {
    let a = Mock::new("A", Capabilities::symbols(), Behaviour::Miss);
    let b = Mock::new("B", Capabilities::symbols(), Behaviour::Miss);
    let agg = Aggregator::with_providers(vec![shared(&a), shared(&b)]);

    assert!(agg.price("NOPE", None).await.is_none());
    assert!(agg.info("NOPE", None).await.is_none());
    assert_eq!(a.calls(), 2);
    assert_eq!(b.calls(), 2);
}

#[tokio::test]
async fn btc_answer_from_second_provider() {
    let a = Mock::new("A", Capabilities::symbols(), Behaviour::Miss);
    let b = Mock::new("B", Capabilities::symbols(), Behaviour::Answer(65000.0));
    let agg = Aggregator::with_providers(vec![shared(&a), shared(&b)]);

    let rec = agg.price("BTC", None).await.expect("B answers");
    assert_eq!(rec.symbol(), "BTC");
    assert_eq!(rec.price_usd(), 65000.0);
    assert_eq!(rec.source(), "B");
}

#[tokio::test]
async fn panicking_provider_is_skipped_in_chain() {
    let a = Mock::new("A", Capabilities::symbols(), Behaviour::Panic);
    let b = Mock::new("B", Capabilities::symbols(), Behaviour::Answer(2.0));
    let agg = Aggregator::with_providers(vec![shared(&a), shared(&b)]);

    let rec = agg.price("SOL", None).await.expect("B answers");
    assert_eq!(rec.source(), "B");
    assert_eq!(a.calls(), 1);
}

#[tokio::test]
async fn address_routes_only_to_address_providers() {
    let sym = Mock::new("SymbolOnly", Capabilities::symbols(), Behaviour::Answer(1.0));
    let dex = Mock::new("Dex", Capabilities::addresses(), Behaviour::Answer(0.000012));
    let agg = Aggregator::with_providers(vec![shared(&sym), shared(&dex)]);

    let rec = agg.price(PEPE, None).await.expect("Dex answers");
    assert_eq!(rec.source(), "Dex");
    assert_eq!(sym.calls(), 0);

    agg.info(PEPE, None).await.expect("Dex answers");
    assert_eq!(sym.calls(), 0);
    assert_eq!(dex.calls(), 2);

    // and symbols never reach the address chain
    agg.price("PEPE", None).await.expect("SymbolOnly answers");
    assert_eq!(dex.calls(), 2);
}

#[tokio::test]
async fn network_bound_provider_needs_a_network() {
    let dex = Mock::new("Dex", Capabilities::addresses(), Behaviour::Miss);
    let chain = Mock::new("Chain", Capabilities::addresses().with_network(), Behaviour::Answer(3.0));
    let agg = Aggregator::with_providers(vec![shared(&dex), shared(&chain)]);

    assert!(agg.price(PEPE, None).await.is_none());
    assert_eq!(chain.calls(), 0);

    let rec = agg.price(PEPE, Some("eth")).await.expect("Chain answers");
    assert_eq!(rec.source(), "Chain");
    assert_eq!(chain.calls(), 1);
}

#[tokio::test]
async fn price_and_info_use_independent_orders() {
    let fast = Mock::new("Fast", Capabilities::symbols(), Behaviour::Answer(1.0));
    let rich = Mock::new("Rich", Capabilities::symbols(), Behaviour::Answer(1.1));
    let routes = Routes {
        price_symbol: vec![shared(&fast), shared(&rich)],
        info_symbol: vec![shared(&rich), shared(&fast)],
        ..Routes::default()
    };
    let agg = Aggregator::new(routes);

    assert_eq!(agg.price("BTC", None).await.map(|r| r.source().to_string()).as_deref(), Some("Fast"));
    assert_eq!(agg.info("BTC", None).await.map(|r| r.source().to_string()).as_deref(), Some("Rich"));
}

#[tokio::test]
async fn search_survives_a_panicking_provider() {
    let a = Mock::searching("A", Behaviour::Answer(0.0), &[("SHIB", "shiba-inu")]);
    let boom = Mock::searching("Boom", Behaviour::Panic, &[("XXX", "never")]);
    let c = Mock::searching("C", Behaviour::Answer(0.0), &[("FLOKI", "floki")]);
    let agg = Aggregator::with_providers(vec![shared(&a), shared(&boom), shared(&c)]);

    let hits = agg.search("inu").await;
    let symbols: Vec<_> = hits.iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(symbols, ["SHIB", "FLOKI"]);
    assert_eq!((a.calls(), boom.calls(), c.calls()), (1, 1, 1));
}

#[tokio::test]
async fn search_dedups_on_symbol_keeping_priority() {
    let a = Mock::searching("A", Behaviour::Answer(0.0), &[("DOGE", "dogecoin"), ("DOGS", "dogs")]);
    let b = Mock::searching("B", Behaviour::Answer(0.0), &[("DOGE", "doge-on-base"), ("DOGEAI", "dogeai")]);
    let agg = Aggregator::with_providers(vec![shared(&a), shared(&b)]);

    let hits = agg.search("doge").await;
    let doge: Vec<_> = hits.iter().filter(|m| m.symbol == "DOGE").collect();
    assert_eq!(doge.len(), 1);
    assert_eq!(doge[0].source, "A");
    assert_eq!(doge[0].id.as_deref(), Some("dogecoin"));

    let order: Vec<_> = hits.iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(order, ["DOGE", "DOGS", "DOGEAI"]);
}

#[tokio::test]
async fn empty_search_is_an_empty_vec() {
    let a = Mock::searching("A", Behaviour::Answer(0.0), &[]);
    let b = Mock::searching("B", Behaviour::Answer(0.0), &[]);
    let agg = Aggregator::with_providers(vec![shared(&a), shared(&b)]);

    assert!(agg.search("zzz_no_such_token_exists").await.is_empty());
    assert_eq!(a.calls() + b.calls(), 2);
}

#[tokio::test]
async fn search_skips_providers_without_search() {
    let plain = Mock::new("Plain", Capabilities::symbols(), Behaviour::Answer(1.0));
    let a = Mock::searching("A", Behaviour::Answer(0.0), &[("BTC", "bitcoin")]);
    let agg = Aggregator::with_providers(vec![shared(&plain), shared(&a)]);

    assert_eq!(agg.search("btc").await.len(), 1);
    assert_eq!(plain.calls(), 0);
}

#[tokio::test]
async fn blank_query_makes_no_calls() {
    let a = Mock::searching("A", Behaviour::Answer(1.0), &[("BTC", "bitcoin")]);
    let agg = Aggregator::with_providers(vec![shared(&a)]);

    assert!(agg.price("   ", None).await.is_none());
    assert!(agg.info("", None).await.is_none());
    assert!(agg.search(" \t").await.is_empty());
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn padding_counts_toward_the_address_length_rule() {
    let sym = Mock::new("SymbolOnly", Capabilities::symbols(), Behaviour::Answer(1.0));
    let dex = Mock::new("Dex", Capabilities::addresses(), Behaviour::Answer(2.0));
    let agg = Aggregator::with_providers(vec![shared(&sym), shared(&dex)]);

    // 30 chars + 1 space = 31 chars, address-like as given
    let padded = format!("{} ", "a".repeat(30));
    let rec = agg.price(&padded, None).await.expect("Dex answers");
    assert_eq!(rec.source(), "Dex");
    // providers see the trimmed query
    assert_eq!(rec.symbol(), "A".repeat(30));
    assert_eq!(sym.calls(), 0);

    agg.info(&padded, None).await.expect("Dex answers");
    assert_eq!(sym.calls(), 0);
}
