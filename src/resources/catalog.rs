//! Resource catalog
//!
//! Every API resource as data: a base path and the operations it supports.
//! Operations differ only in route, query handling, response shape and body,
//! so one table replaces a hand-written method per endpoint.

use crate::error::{Error, Result};
use crate::http::split_route;
use crate::types::Method;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Where an operation's path goes relative to its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `{path}`
    Root,
    /// `{path}/{id}`
    Item,
    /// `{path}/{id}/{segment}`
    ItemChild(&'static str),
    /// `{path}/{segment}`
    Child(&'static str),
}

impl Route {
    /// Whether the route embeds an identifier
    pub fn needs_identifier(self) -> bool {
        matches!(self, Route::Item | Route::ItemChild(_))
    }
}

/// How caller parameters become the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStyle {
    /// No query string
    None,
    /// Caller parameters as given
    Passthrough,
    /// `offset=0&limit=100` defaults overridden by caller parameters
    Paged,
    /// `Paged`, with `period` rewritten into `sort=trending_<period>`
    Trending,
}

/// Shape of a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Normalized into a page
    Paged,
    /// Returned as decoded
    Raw,
}

/// Request body an operation expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    /// Caller-supplied JSON document
    Json,
    /// `{"urls": [...]}` built from the caller's URL list
    Urls,
}

/// One operation on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: Method,
    pub route: Route,
    pub query: QueryStyle,
    pub shape: Shape,
    pub body: BodyKind,
    /// Query parameter that must be present and non-empty
    pub required_param: Option<&'static str>,
}

impl Operation {
    const fn new(
        name: &'static str,
        method: Method,
        route: Route,
        query: QueryStyle,
        shape: Shape,
    ) -> Self {
        Self {
            name,
            method,
            route,
            query,
            shape,
            body: BodyKind::None,
            required_param: None,
        }
    }

    /// `GET {path}` with paging defaults
    const fn list() -> Self {
        Self::new("list", Method::GET, Route::Root, QueryStyle::Paged, Shape::Paged)
    }

    /// `GET {path}` sorted by a trending window
    const fn trending() -> Self {
        Self::new(
            "trending",
            Method::GET,
            Route::Root,
            QueryStyle::Trending,
            Shape::Paged,
        )
    }

    /// `GET {path}/{id}`
    const fn get() -> Self {
        Self::new("get", Method::GET, Route::Item, QueryStyle::None, Shape::Raw)
    }

    /// `GET {path}/{id}/export`
    const fn export() -> Self {
        Self::new(
            "export",
            Method::GET,
            Route::ItemChild("export"),
            QueryStyle::None,
            Shape::Raw,
        )
    }

    /// `POST {path}/{id}/enrich`
    const fn enrich() -> Self {
        Self::new(
            "enrich",
            Method::POST,
            Route::ItemChild("enrich"),
            QueryStyle::None,
            Shape::Raw,
        )
    }

    /// `GET {path}/{id}/{segment}` with caller parameters
    const fn related(name: &'static str, segment: &'static str) -> Self {
        Self::new(
            name,
            Method::GET,
            Route::ItemChild(segment),
            QueryStyle::Passthrough,
            Shape::Raw,
        )
    }

    /// Same as `related`, normalized into a page
    const fn related_paged(name: &'static str, segment: &'static str) -> Self {
        Self::new(
            name,
            Method::GET,
            Route::ItemChild(segment),
            QueryStyle::Passthrough,
            Shape::Paged,
        )
    }

    /// `GET {path}/{segment}`
    const fn child(name: &'static str, segment: &'static str) -> Self {
        Self::new(
            name,
            Method::GET,
            Route::Child(segment),
            QueryStyle::None,
            Shape::Raw,
        )
    }

    /// `GET {path}/{segment}` with paging defaults
    const fn child_paged(name: &'static str, segment: &'static str) -> Self {
        Self::new(
            name,
            Method::GET,
            Route::Child(segment),
            QueryStyle::Paged,
            Shape::Paged,
        )
    }

    const fn with_query(mut self, query: QueryStyle) -> Self {
        self.query = query;
        self
    }

    const fn with_body(mut self, body: BodyKind) -> Self {
        self.body = body;
        self
    }

    const fn requires(mut self, param: &'static str) -> Self {
        self.required_param = Some(param);
        self
    }

    /// Whether the operation needs an identifier
    pub fn needs_identifier(&self) -> bool {
        self.route.needs_identifier()
    }

    /// Whether responses are normalized into pages
    pub fn is_paged(&self) -> bool {
        self.shape == Shape::Paged
    }

    /// Path segments under `base`.
    ///
    /// The identifier stays a single segment whatever characters it holds.
    /// An empty identifier counts as missing.
    pub fn segments(&self, base: &str, identifier: Option<&str>) -> Result<Vec<String>> {
        let id = || {
            identifier
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::missing_argument(format!(
                        "Method '{}' requires an identifier",
                        self.name
                    ))
                })
        };

        let mut segments = split_route(base);
        match self.route {
            Route::Root => {}
            Route::Item => segments.push(id()?),
            Route::ItemChild(segment) => {
                segments.push(id()?);
                segments.push(segment.to_string());
            }
            Route::Child(segment) => segments.push(segment.to_string()),
        }
        Ok(segments)
    }
}

/// A resource: name, base path and operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDef {
    pub name: &'static str,
    pub path: &'static str,
    pub operations: &'static [Operation],
}

impl ResourceDef {
    /// Find an operation by name
    pub fn operation(&self, name: &str) -> Option<&'static Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Operation names, sorted
    pub fn operation_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operations.iter().map(|op| op.name).collect();
        names.sort_unstable();
        names
    }
}

// ============================================================================
// Resources
// ============================================================================

pub static VULNERABILITIES: ResourceDef = ResourceDef {
    name: "vulnerabilities",
    path: "/vulnerabilities",
    operations: &[
        Operation::list(),
        Operation::trending(),
        Operation::child_paged("exploited", "exploited"),
        Operation::get(),
        Operation::export(),
        Operation::related("configurations", "configurations"),
        Operation::related("detection_signatures", "detection_signatures"),
        Operation::related("exploits", "exploits"),
        Operation::related("exploitations", "exploitations"),
        Operation::related("mentions", "mentions"),
        Operation::related("products", "products"),
        Operation::related("advisories", "technology_product_advisories"),
        Operation::related("observables", "observables"),
        Operation::related("used_by_malware", "used_by_malware"),
        Operation::enrich(),
    ],
};

pub static THREAT_ACTORS: ResourceDef = ResourceDef {
    name: "threat_actors",
    path: "/threat_actors",
    operations: &[
        Operation::list(),
        Operation::trending(),
        Operation::get(),
        Operation::export(),
        Operation::related("mentions", "mentions"),
        Operation::enrich(),
    ],
};

pub static MALWARE: ResourceDef = ResourceDef {
    name: "malware",
    path: "/malware",
    operations: &[
        Operation::list(),
        Operation::trending(),
        Operation::get(),
        Operation::export(),
        Operation::related("mentions", "mentions"),
    ],
};

pub static EXPLOITS: ResourceDef = ResourceDef {
    name: "exploits",
    path: "/exploits",
    operations: &[Operation::list(), Operation::get()],
};

pub static EXPLOITATIONS: ResourceDef = ResourceDef {
    name: "exploitations",
    path: "/exploitations",
    operations: &[Operation::list(), Operation::get()],
};

pub static ORGANIZATIONS: ResourceDef = ResourceDef {
    name: "organizations",
    path: "/organizations",
    operations: &[
        Operation::list(),
        Operation::trending(),
        Operation::get(),
        Operation::export(),
        Operation::related("mentions", "mentions"),
        Operation::related("products", "products"),
        Operation::related("breaches", "breaches"),
        Operation::enrich(),
    ],
};

pub static PRODUCTS: ResourceDef = ResourceDef {
    name: "products",
    path: "/products",
    operations: &[
        Operation::list(),
        Operation::trending(),
        Operation::new(
            "search",
            Method::POST,
            Route::Child("search"),
            QueryStyle::None,
            Shape::Raw,
        )
        .with_body(BodyKind::Json),
        Operation::get(),
        Operation::export(),
        Operation::related("advisories", "technology_product_advisories"),
        Operation::related("mentions", "mentions"),
        Operation::new(
            "update",
            Method::PATCH,
            Route::Item,
            QueryStyle::None,
            Shape::Raw,
        )
        .with_body(BodyKind::Json),
        Operation::enrich(),
    ],
};

pub static ATTACK_PATTERNS: ResourceDef = ResourceDef {
    name: "attack_patterns",
    path: "/attack_patterns",
    operations: &[
        Operation::list(),
        Operation::trending(),
        Operation::get(),
        Operation::related("mentions", "mentions"),
        Operation::related("threat_actors", "threat_actors"),
        Operation::related("malware", "malware"),
    ],
};

pub static BREACHES: ResourceDef = ResourceDef {
    name: "breaches",
    path: "/breaches",
    operations: &[
        Operation::list(),
        Operation::get(),
        Operation::related("organizations", "organizations"),
    ],
};

pub static DETECTION_SIGNATURES: ResourceDef = ResourceDef {
    name: "detection_signatures",
    path: "/detection_signatures",
    operations: &[Operation::list(), Operation::get()],
};

pub static ADVISORIES: ResourceDef = ResourceDef {
    name: "advisories",
    path: "/technology_product_advisories",
    operations: &[
        Operation::list(),
        Operation::get(),
        Operation::export(),
        Operation::related("products", "products"),
        Operation::related("vulnerabilities", "vulnerabilities"),
    ],
};

pub static WEAKNESSES: ResourceDef = ResourceDef {
    name: "weaknesses",
    path: "/weaknesses",
    operations: &[Operation::list(), Operation::get()],
};

pub static STORIES: ResourceDef = ResourceDef {
    name: "stories",
    path: "/stories",
    operations: &[
        Operation::list(),
        Operation::child("topics", "topics"),
        Operation::get(),
        Operation::related_paged("references", "references"),
        Operation::related_paged("events", "events"),
        Operation::related("similar", "similar"),
        Operation::related("entities", "entities"),
        Operation::export(),
    ],
};

pub static REFERENCES: ResourceDef = ResourceDef {
    name: "references",
    path: "/references",
    operations: &[
        Operation::list(),
        Operation::child("labels", "labels"),
        Operation::get(),
        Operation::related("entities", "entities").with_query(QueryStyle::None),
        Operation::new(
            "create",
            Method::POST,
            Route::Root,
            QueryStyle::None,
            Shape::Raw,
        )
        .with_body(BodyKind::Urls),
        Operation::related("threat_actors", "threat-actors"),
        Operation::related("threat_actor_mentions", "threat-actor-mentions"),
        Operation::related("vulnerabilities", "vulnerabilities"),
        Operation::related("vulnerability_mentions", "vulnerability-mentions"),
    ],
};

pub static SOURCES: ResourceDef = ResourceDef {
    name: "sources",
    path: "/sources",
    operations: &[
        Operation::list(),
        Operation::new(
            "statistics",
            Method::GET,
            Route::ItemChild("statistics"),
            QueryStyle::None,
            Shape::Raw,
        ),
    ],
};

pub static CONTENT_CHUNKS: ResourceDef = ResourceDef {
    name: "content_chunks",
    path: "/content_chunks",
    operations: &[
        Operation::list(),
        Operation::child_paged("search", "search").with_query(QueryStyle::Passthrough),
        Operation::get(),
    ],
};

pub static MENTIONS: ResourceDef = ResourceDef {
    name: "mentions",
    path: "/mentions",
    operations: &[
        Operation::list(),
        Operation::child_paged("actors", "actors"),
        Operation::child_paged("vulnerabilities", "vulnerabilities"),
    ],
};

pub static SEARCH: ResourceDef = ResourceDef {
    name: "search",
    path: "/search",
    operations: &[Operation::new(
        "query",
        Method::GET,
        Route::Root,
        QueryStyle::Passthrough,
        Shape::Raw,
    )
    .requires("q")],
};

pub static USER: ResourceDef = ResourceDef {
    name: "user",
    path: "/user",
    operations: &[Operation::new(
        "me",
        Method::GET,
        Route::Root,
        QueryStyle::None,
        Shape::Raw,
    )],
};

/// Every resource, in display order
pub static RESOURCES: &[&ResourceDef] = &[
    &VULNERABILITIES,
    &THREAT_ACTORS,
    &MALWARE,
    &EXPLOITS,
    &EXPLOITATIONS,
    &ORGANIZATIONS,
    &PRODUCTS,
    &ATTACK_PATTERNS,
    &BREACHES,
    &DETECTION_SIGNATURES,
    &ADVISORIES,
    &WEAKNESSES,
    &STORIES,
    &REFERENCES,
    &SOURCES,
    &CONTENT_CHUNKS,
    &MENTIONS,
    &SEARCH,
    &USER,
];

/// Short names accepted in place of a resource name
pub static ALIASES: &[(&str, &str)] = &[
    ("actors", "threat_actors"),
    ("aps", "attack_patterns"),
    ("chunks", "content_chunks"),
    ("orgs", "organizations"),
    ("sigs", "detection_signatures"),
    ("vulns", "vulnerabilities"),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static ResourceDef>> =
    LazyLock::new(|| RESOURCES.iter().map(|def| (def.name, *def)).collect());

/// Canonical resource name for `name`: trimmed, lower-cased, aliases resolved
pub fn canonical_name(name: &str) -> String {
    let key = name.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, full)| (*full).to_string())
}

/// Find a resource by name or alias
pub fn lookup(name: &str) -> Option<&'static ResourceDef> {
    BY_NAME.get(canonical_name(name).as_str()).copied()
}

/// Like [`lookup`], failing with [`Error::UnknownResource`]
pub fn require(name: &str) -> Result<&'static ResourceDef> {
    lookup(name).ok_or_else(|| Error::UnknownResource {
        name: name.to_string(),
    })
}

/// Names of every resource, in display order
pub fn resource_names() -> Vec<&'static str> {
    RESOURCES.iter().map(|def| def.name).collect()
}
