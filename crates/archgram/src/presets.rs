//! Built-in diagrams.

use archgram_core::model::{
    Component, Connection, Diagram, DiagramDescription, Layer, ModelError, Position,
};

type LayerRow = (&'static str, &'static str, (f32, f32), &'static [(&'static str, &'static str)]);

const X_ALGORITHM_NAME: &str = "X Algorithm Architecture";

const X_ALGORITHM_LAYERS: &[LayerRow] = &[
    (
        "Client Layer",
        "client",
        (50.0, 50.0),
        &[
            ("Twitter App/Web", "twitter-app"),
            ("Mobile Clients", "mobile-clients"),
        ],
    ),
    (
        "API Layer",
        "api",
        (400.0, 50.0),
        &[
            ("HTTP Controller", "http-controller"),
            ("Thrift Controller", "thrift-controller"),
        ],
    ),
    (
        "Product Pipeline Layer",
        "product",
        (50.0, 200.0),
        &[
            ("ForYou Pipeline", "foryou-pipeline"),
            ("Following Pipeline", "following-pipeline"),
            ("ListTweets Pipeline", "listtweets-pipeline"),
        ],
    ),
    (
        "Mixer Pipeline Layer",
        "mixer",
        (400.0, 200.0),
        &[
            ("ForYou Mixer", "foryou-mixer"),
            ("Following Mixer", "following-mixer"),
            ("ListTweets Mixer", "listtweets-mixer"),
        ],
    ),
    (
        "Candidate Sources",
        "data",
        (750.0, 50.0),
        &[
            ("Earlybird Search", "earlybird-search"),
            ("Tweet Mixer", "tweet-mixer"),
            ("FRS Service", "frs-service"),
            ("User Entity Graph", "user-entity-graph"),
            ("RealTime Graph", "realtime-graph"),
            ("Timeline Service", "timeline-service"),
            ("Ads Service", "ads-service"),
        ],
    ),
    (
        "ML & Feature Layer",
        "ml",
        (1100.0, 50.0),
        &[
            ("Feature Store", "feature-store"),
            ("ML Models", "ml-models"),
            ("Scoring Pipelines", "scoring-pipelines"),
            ("Feature Hydrators", "feature-hydrators"),
        ],
    ),
    (
        "Data Sources",
        "data",
        (1100.0, 350.0),
        &[
            ("Search Index", "search-index"),
            ("User Graph", "user-graph"),
            ("Engagement Data", "engagement-data"),
            ("RealTime Signals", "realtime-signals"),
            ("Cache Stores", "cache-stores"),
        ],
    ),
];

const X_ALGORITHM_CONNECTIONS: &[(&str, &str)] = &[
    // Client to API
    ("twitter-app", "http-controller"),
    ("mobile-clients", "http-controller"),
    // API to product pipelines
    ("http-controller", "foryou-pipeline"),
    ("http-controller", "following-pipeline"),
    ("http-controller", "listtweets-pipeline"),
    // Product pipelines to mixers
    ("foryou-pipeline", "foryou-mixer"),
    ("following-pipeline", "following-mixer"),
    ("listtweets-pipeline", "listtweets-mixer"),
    // Mixers to candidate sources
    ("foryou-mixer", "earlybird-search"),
    ("foryou-mixer", "tweet-mixer"),
    ("foryou-mixer", "frs-service"),
    ("foryou-mixer", "user-entity-graph"),
    ("following-mixer", "earlybird-search"),
    ("following-mixer", "timeline-service"),
    ("listtweets-mixer", "timeline-service"),
    // Mixers to ML
    ("foryou-mixer", "feature-hydrators"),
    ("following-mixer", "feature-hydrators"),
    ("listtweets-mixer", "feature-hydrators"),
    // Candidate sources to data sources
    ("earlybird-search", "search-index"),
    ("tweet-mixer", "user-graph"),
    ("frs-service", "engagement-data"),
    ("user-entity-graph", "user-graph"),
    ("realtime-graph", "realtime-signals"),
    ("timeline-service", "search-index"),
    // Within the ML layer
    ("feature-hydrators", "feature-store"),
    ("feature-hydrators", "scoring-pipelines"),
    ("scoring-pipelines", "ml-models"),
];

/// The unvalidated description of the X Algorithm recommendation stack.
pub fn x_algorithm_description() -> DiagramDescription {
    let layers = X_ALGORITHM_LAYERS
        .iter()
        .map(|(name, color_key, (x, y), components)| {
            Layer::new(
                *name,
                *color_key,
                Position::new(*x, *y),
                components
                    .iter()
                    .map(|(name, id)| Component::new(*name, *id))
                    .collect(),
            )
        })
        .collect();

    let connections = X_ALGORITHM_CONNECTIONS
        .iter()
        .map(|(from, to)| Connection::new(*from, *to))
        .collect();

    DiagramDescription {
        name: Some(X_ALGORITHM_NAME.to_string()),
        layers,
        connections,
    }
}

/// The X Algorithm recommendation stack: seven layers from the clients down
/// to the data sources, with 27 connections.
///
/// # Errors
///
/// Never fails in practice; the description is checked like any other.
pub fn x_algorithm() -> Result<Diagram, ModelError> {
    Diagram::try_from(x_algorithm_description())
}
