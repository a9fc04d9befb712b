//! Built-in article and glossary content served when no backend is attached.

use chrono::{DateTime, Utc};

use super::{Article, Term};

fn at(unix_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_secs, 0).unwrap_or_default()
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

pub fn sample_articles() -> Vec<Article> {
    vec![
        Article {
            id: 1,
            slug: "what-is-proof-of-work".into(),
            title: "What Is Proof of Work?".into(),
            excerpt: "Why miners burn hashes to agree on history.".into(),
            body: "# Proof of Work\n\nMiners vary a **nonce** until the block hash \
                   starts with enough zeros."
                .into(),
            category: "consensus".into(),
            tags: tags(&["pow", "mining", "bitcoin"]),
            featured: true,
            view_count: 0,
            // 2024-01-10T09:00:00Z
            published_at: at(1_704_877_200),
        },
        Article {
            id: 2,
            slug: "automated-market-makers".into(),
            title: "Automated Market Makers Explained".into(),
            excerpt: "Constant-product pools and how prices move.".into(),
            body: "# AMMs\n\n`x * y = k` keeps the pool balanced.".into(),
            category: "defi".into(),
            tags: tags(&["amm", "liquidity", "uniswap"]),
            featured: false,
            view_count: 0,
            // 2024-02-14T12:00:00Z
            published_at: at(1_707_912_000),
        },
        Article {
            id: 3,
            slug: "staking-and-validators".into(),
            title: "Staking and Validator Selection".into(),
            excerpt: "Stake-weighted lotteries replace hash power.".into(),
            body: "# Proof of Stake\n\nA validator with 50% of the stake \
                   proposes about half the blocks."
                .into(),
            category: "consensus".into(),
            tags: tags(&["pos", "staking", "validators"]),
            featured: true,
            view_count: 0,
            // 2024-03-05T08:30:00Z
            published_at: at(1_709_627_400),
        },
        Article {
            id: 4,
            slug: "lending-protocols".into(),
            title: "Over-Collateralized Lending".into(),
            excerpt: "Borrowing against crypto and what liquidation means.".into(),
            body: "# Lending\n\nPositions below the health factor get liquidated.".into(),
            category: "defi".into(),
            tags: tags(&["lending", "liquidation", "staking"]),
            featured: false,
            view_count: 0,
            // 2024-04-20T16:45:00Z
            published_at: at(1_713_631_500),
        },
        Article {
            id: 5,
            slug: "byzantine-fault-tolerance".into(),
            title: "Byzantine Fault Tolerance in Practice".into(),
            excerpt: "Why 3f+1 nodes survive f traitors.".into(),
            body: "# BFT\n\nPre-prepare, prepare, commit: two quorums of 2f+1.".into(),
            category: "consensus".into(),
            tags: tags(&["bft", "pbft", "finality"]),
            featured: false,
            view_count: 0,
            // 2024-05-02T10:15:00Z
            published_at: at(1_714_644_900),
        },
    ]
}

pub fn sample_terms() -> Vec<Term> {
    let rows: [(&str, &str, &str); 6] = [
        (
            "Difficulty",
            "Required count of leading zero characters in a hash's hexadecimal form.",
            "pow",
        ),
        (
            "Nonce",
            "The integer search variable varied to find a qualifying hash.",
            "pow",
        ),
        (
            "Stake weight",
            "A validator's relative voting or selection power.",
            "pos",
        ),
        (
            "Plan tier",
            "A named subscription level gating access to demo modules.",
            "site",
        ),
        (
            "Quorum",
            "2f+1 matching votes out of 3f+1 nodes.",
            "bft",
        ),
        (
            "Tick",
            "One sequential hash iteration of a proof-of-history chain.",
            "poh",
        ),
    ];
    rows.iter()
        .enumerate()
        .map(|(i, (name, definition, category))| Term {
            id: i as u64 + 1,
            name: name.to_string(),
            definition: definition.to_string(),
            category: category.to_string(),
        })
        .collect()
}
