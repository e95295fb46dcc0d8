pub mod shared {
    pub mod core {
        pub mod clock;
    }
    pub mod infrastructure {
        pub mod aggregate_store;
        pub mod event_queue;
        pub mod github;
    }
}

pub mod modules {
    pub mod github_events {
        pub mod core {
            pub mod aggregates;
            pub mod decode_error;
            pub mod raw_event;
        }
        pub mod use_cases {
            pub mod fetch_events {
                pub mod feed_port;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod consume_event {
                pub mod counter;
                pub mod errors;
                pub mod handler;
                pub mod worker;
            }
            pub mod query_aggregates {
                pub mod enrichment_port;
                pub mod field;
                pub mod handler;
                pub mod views;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod aggregate_repository;
                pub mod aggregate_schema;
                pub mod github_feed;
                pub mod github_stars;
            }
        }
    }
}

pub mod shell;
