use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use pricefold_rs::market_data::types::{
    GasOracle, GlobalMarket, PriceChart, PriceRecord, SearchMatch, Sentiment, TokenInfoRecord,
    TopCoin, TrendingCoin,
};
use pricefold_rs::{telemetry, Aggregator, DefaultProviders, Settings};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok(); // load .env

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(ms) = args.timeout_ms {
        settings.http.timeout_ms = ms;
    }

    telemetry::init_tracing(&settings.log_filter);
    if let Some(port) = args.metrics_port {
        telemetry::init_metrics(port)?;
    }

    let providers = DefaultProviders::new(&settings).context("building HTTP client")?;
    let aggregator = Aggregator::new(providers.routes());
    let reports = providers.reports();
    let json = args.json;

    let found = match args.command {
        Command::Price { query, network } => {
            let res = aggregator.price(&query, network.as_deref()).await;
            emit(json, res.as_ref(), print_price)?
                || not_found(&format!("No price found for '{}'", query))
        }
        Command::Info { query, network } => {
            let res = aggregator.info(&query, network.as_deref()).await;
            emit(json, res.as_ref(), print_info)?
                || not_found(&format!("No token info found for '{}'", query))
        }
        Command::Search { query } => {
            // an empty match list is a valid answer, not a miss
            let res = aggregator.search(&query).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&res)?);
            } else {
                print_search(&res);
            }
            true
        }
        Command::Market => {
            let res = reports.market().await;
            emit(json, res.as_ref(), print_market)? || not_found("Could not fetch global market data")
        }
        Command::Trending => {
            let res = reports.trending().await;
            emit_list(json, &res, print_trending)? || not_found("Could not fetch trending coins")
        }
        Command::Top => {
            let res = reports.top().await;
            emit_list(json, &res, print_top)? || not_found("Could not fetch top coins")
        }
        Command::Sentiment => {
            let res = reports.sentiment().await;
            emit(json, res.as_ref(), print_sentiment)? || not_found("Could not fetch the fear & greed index")
        }
        Command::Gas => {
            let res = reports.gas().await;
            emit(json, res.as_ref(), print_gas)? || not_found("Could not fetch gas prices")
        }
        Command::Chart { query, days } => {
            let res = reports.chart(&query, days).await;
            emit(json, res.as_ref(), print_chart)?
                || not_found(&format!("No chart data for '{}'", query))
        }
    };

    Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn not_found(msg: &str) -> bool {
    eprintln!("{}", msg);
    false
}

/// Print `value` if present. Returns whether anything was printed.
fn emit<T: Serialize>(json: bool, value: Option<&T>, plain: fn(&T)) -> anyhow::Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        plain(value);
    }
    Ok(true)
}

fn emit_list<T: Serialize>(json: bool, values: &[T], plain: fn(&[T])) -> anyhow::Result<bool> {
    if values.is_empty() {
        return Ok(false);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(values)?);
    } else {
        plain(values);
    }
    Ok(true)
}

fn usd(v: f64) -> String {
    if v >= 1.0 {
        format!("${:.2}", v)
    } else {
        format!("${:.8}", v)
    }
}

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "-".into())
}

fn print_price(p: &PriceRecord) {
    println!("{}  {}  (source: {}, at {})", p.symbol(), usd(p.price_usd()), p.source(), p.observed_at().to_rfc3339());
}

fn print_info(i: &TokenInfoRecord) {
    println!("{} ({})", i.name, i.symbol());
    println!("  price:        {}", usd(i.price_usd()));
    println!("  source:       {}", i.source());
    if let Some(addr) = &i.address {
        println!("  address:      {}", addr);
    }
    if let Some(net) = &i.network {
        println!("  network:      {}", net);
    }
    println!("  market cap:   {}", opt(i.market_cap.map(usd)));
    println!("  rank:         {}", opt(i.market_cap_rank));
    println!("  fdv:          {}", opt(i.fdv.map(usd)));
    println!("  volume 24h:   {}", opt(i.volume_24h.map(usd)));
    println!("  liquidity:    {}", opt(i.liquidity_usd.map(usd)));
    println!("  change 24h:   {}", opt(i.price_change_percentage_24h.map(|c| format!("{:.2}%", c))));
    println!("  change 7d:    {}", opt(i.price_change_percentage_7d.map(|c| format!("{:.2}%", c))));
    println!("  circulating:  {}", opt(i.circulating_supply));
    println!("  total supply: {}", opt(i.total_supply));
    println!("  max supply:   {}", opt(i.max_supply));
    if let Some(ath) = i.ath {
        println!("  ath:          {} ({})", usd(ath), opt(i.ath_date.map(|d| d.date_naive())));
    }
    if let Some(atl) = i.atl {
        println!("  atl:          {} ({})", usd(atl), opt(i.atl_date.map(|d| d.date_naive())));
    }
    let links = [
        ("website", &i.links.website),
        ("twitter", &i.links.twitter),
        ("telegram", &i.links.telegram),
        ("discord", &i.links.discord),
        ("github", &i.links.github),
    ];
    for (label, link) in links {
        if let Some(url) = link {
            println!("  {:<13} {}", format!("{}:", label), url);
        }
    }
    if !i.pairs.is_empty() {
        println!("  pairs:");
        for p in &i.pairs {
            println!(
                "    {}/{} on {} ({})  price {}  liq {}",
                p.base_symbol,
                p.quote_symbol,
                p.dex_id,
                opt(p.network.as_deref()),
                opt(p.price_usd.map(usd)),
                opt(p.liquidity_usd.map(usd)),
            );
        }
    }
    if let Some(desc) = &i.description {
        let short: String = desc.chars().take(280).collect();
        println!("\n{}", short);
    }
}

fn print_search(matches: &[SearchMatch]) {
    for m in matches {
        println!(
            "{:<10} {:<30} {:<24} {}",
            m.symbol,
            m.name,
            m.id.as_deref().unwrap_or("-"),
            m.source
        );
    }
}

fn print_market(m: &GlobalMarket) {
    println!("Total market cap:  {}", usd(m.total_market_cap_usd));
    println!("24h volume:        {}", usd(m.total_volume_24h_usd));
    println!("BTC dominance:     {:.2}%", m.bitcoin_dominance_percentage);
    println!("ETH dominance:     {:.2}%", m.ethereum_dominance_percentage);
    println!("Active coins:      {}", m.active_cryptocurrencies);
    println!("Last updated:      {}", m.last_updated.to_rfc3339());
}

fn print_trending(coins: &[TrendingCoin]) {
    for (n, c) in coins.iter().enumerate() {
        println!(
            "{:>2}. {:<10} {:<24} rank {:<6} price {:<16} 24h {}",
            n + 1,
            c.symbol,
            c.name,
            opt(c.market_cap_rank),
            opt(c.price_usd.map(usd)),
            opt(c.price_change_24h.map(|p| format!("{:.2}%", p))),
        );
    }
}

fn print_top(coins: &[TopCoin]) {
    for c in coins {
        println!(
            "{:>4} {:<10} {:<24} {:<16} mcap {:<20} 24h {}",
            opt(c.market_cap_rank),
            c.symbol,
            c.name,
            opt(c.price_usd.map(usd)),
            opt(c.market_cap.map(usd)),
            opt(c.price_change_24h.map(|p| format!("{:.2}%", p))),
        );
    }
}

fn print_sentiment(s: &Sentiment) {
    println!("Fear & greed: {} ({}) at {}", s.value, s.classification, s.last_updated.to_rfc3339());
}

fn print_gas(g: &GasOracle) {
    println!("{} gas (gwei)", g.network);
    println!("  low:      {}", g.low);
    println!("  average:  {}", g.average);
    println!("  high:     {}", g.high);
    println!("  base fee: {}", opt(g.base_fee));
}

fn print_chart(c: &PriceChart) {
    println!("{}: {} points, min {}, max {}", c.coin_id, c.points.len(), usd(c.min_price), usd(c.max_price));
    for (at, price) in &c.points {
        println!("  {}  {}", at.to_rfc3339(), usd(*price));
    }
}
