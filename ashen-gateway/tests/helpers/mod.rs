//! Test backends for gateway integration tests
//!
//! The REST backend is the real ashen-rest router on an in-memory database.
//! The SOAP backend is a small axum stub that speaks the guild service's
//! envelope format, including its faults (HTTP 500 + `<soap:Fault>`).

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

use ashen_gateway::clients::{build_http_client, RestClient, SoapClient};
use ashen_gateway::soap::xml::{self, XmlNode};
use ashen_gateway::{build_router, AppState};

/// Nothing listens here; connections are refused immediately
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    let addr: SocketAddr = listener.local_addr().expect("Should have local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}

/// Start ashen-rest on an ephemeral port; returns its base URL
pub async fn spawn_rest_backend() -> String {
    let pool = ashen_rest::db::init_in_memory_pool()
        .await
        .expect("Should create in-memory database");
    serve(ashen_rest::build_router(ashen_rest::AppState::new(pool))).await
}

// =============================================================================
// SOAP stub
// =============================================================================

#[derive(Debug, Clone)]
struct StubGuild {
    id: i64,
    name: String,
    description: String,
    leader: String,
    member_count: i64,
}

#[derive(Debug, Clone)]
struct StubMember {
    id: i64,
    character_name: String,
    guild_id: i64,
    rank: String,
}

#[derive(Debug, Default)]
struct StubData {
    guilds: Vec<StubGuild>,
    members: Vec<StubMember>,
    broken_members: HashSet<i64>,
    empty_lookups: bool,
    error_status: Option<StatusCode>,
}

/// Handle to a running SOAP stub
#[derive(Clone)]
pub struct SoapStub {
    pub url: String,
    data: Arc<Mutex<StubData>>,
}

impl SoapStub {
    /// Make `get_guild_members` fault for one guild
    pub fn break_members(&self, guild_id: i64) {
        self.data.lock().unwrap().broken_members.insert(guild_id);
    }

    /// Answer `get_guild_by_id` with an envelope that holds no guild
    pub fn empty_lookups(&self) {
        self.data.lock().unwrap().empty_lookups = true;
    }

    /// Send fault-free envelopes with this status instead of 200
    pub fn answer_with_status(&self, status: StatusCode) {
        self.data.lock().unwrap().error_status = Some(status);
    }

    pub fn guild_count(&self) -> usize {
        self.data.lock().unwrap().guilds.len()
    }
}

/// Start the SOAP stub on an ephemeral port
pub async fn spawn_soap_stub() -> SoapStub {
    let data = Arc::new(Mutex::new(StubData::default()));
    let router = Router::new()
        .route("/", get(wsdl))
        .route("/soap", post(soap_endpoint))
        .with_state(data.clone());
    let url = serve(router).await;
    SoapStub { url, data }
}

async fn wsdl() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/xml")],
        r#"<?xml version="1.0"?><definitions name="GuildService"/>"#,
    )
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

fn envelope(operation: &str, inner: &str) -> Response {
    xml_response(
        StatusCode::OK,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
               xmlns:tns="http://ashennetwork.soap/guild">
    <soap:Body>
        <tns:{op}Response>{inner}</tns:{op}Response>
    </soap:Body>
</soap:Envelope>"#,
            op = operation,
            inner = inner
        ),
    )
}

fn fault(message: &str) -> Response {
    xml_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
    <soap:Body>
        <soap:Fault>
            <faultcode>Server</faultcode>
            <faultstring>{}</faultstring>
        </soap:Fault>
    </soap:Body>
</soap:Envelope>"#,
            message
        ),
    )
}

fn guild_xml(g: &StubGuild) -> String {
    format!(
        "<guild><id>{}</id><name>{}</name><description>{}</description><leader>{}</leader><member_count>{}</member_count></guild>",
        g.id, g.name, g.description, g.leader, g.member_count
    )
}

fn member_xml(m: &StubMember) -> String {
    format!(
        "<member><id>{}</id><character_name>{}</character_name><guild_id>{}</guild_id><rank>{}</rank><join_date>2024-01-01</join_date></member>",
        m.id, m.character_name, m.guild_id, m.rank
    )
}

fn guild_id_param(op: &XmlNode) -> Option<i64> {
    op.child_text("guild_id").and_then(|v| v.parse().ok())
}

fn text_param(op: &XmlNode, name: &str) -> Option<String> {
    op.child_text(name).map(str::to_string)
}

async fn soap_endpoint(State(data): State<Arc<Mutex<StubData>>>, body: String) -> Response {
    let mut response = dispatch(&data, &body);
    if response.status() == StatusCode::OK {
        if let Some(status) = data.lock().unwrap().error_status {
            *response.status_mut() = status;
        }
    }
    response
}

fn dispatch(data: &Mutex<StubData>, body: &str) -> Response {
    let doc = xml::parse(body);
    let mut data = data.lock().unwrap();

    if doc.find("get_all_guilds").is_some() {
        let inner: String = data.guilds.iter().map(guild_xml).collect();
        return envelope("get_all_guilds", &inner);
    }

    if let Some(op) = doc.find("get_guild_by_id") {
        let Some(id) = guild_id_param(op) else {
            return fault("Invalid guild_id");
        };
        if data.empty_lookups {
            return envelope("get_guild_by_id", "");
        }
        return match data.guilds.iter().find(|g| g.id == id) {
            Some(g) => envelope("get_guild_by_id", &guild_xml(g)),
            None => fault("Guild not found"),
        };
    }

    if let Some(op) = doc.find("create_guild") {
        let (Some(name), Some(description), Some(leader)) = (
            text_param(op, "name"),
            text_param(op, "description"),
            text_param(op, "leader"),
        ) else {
            return fault("Missing required fields");
        };
        if data.guilds.iter().any(|g| g.name == name) {
            return fault("Guild name already exists");
        }
        let guild = StubGuild {
            id: data.guilds.len() as i64 + 1,
            name,
            description,
            leader: leader.clone(),
            member_count: 1,
        };
        let member_id = data.members.len() as i64 + 1;
        data.members.push(StubMember {
            id: member_id,
            character_name: leader,
            guild_id: guild.id,
            rank: "Leader".to_string(),
        });
        let response = envelope("create_guild", &guild_xml(&guild));
        data.guilds.push(guild);
        return response;
    }

    if let Some(op) = doc.find("join_guild") {
        let (Some(guild_id), Some(character_name)) =
            (guild_id_param(op), text_param(op, "character_name"))
        else {
            return fault("Missing required fields");
        };
        if !data.guilds.iter().any(|g| g.id == guild_id) {
            return fault("Guild not found");
        }
        if data
            .members
            .iter()
            .any(|m| m.guild_id == guild_id && m.character_name == character_name)
        {
            return fault("Character already in guild");
        }
        let member_id = data.members.len() as i64 + 1;
        data.members.push(StubMember {
            id: member_id,
            character_name: character_name.clone(),
            guild_id,
            rank: "Member".to_string(),
        });
        if let Some(g) = data.guilds.iter_mut().find(|g| g.id == guild_id) {
            g.member_count += 1;
        }
        return envelope(
            "join_guild",
            &format!(
                "<message>Character {} joined guild successfully</message>",
                character_name
            ),
        );
    }

    if let Some(op) = doc.find("get_guild_members") {
        let Some(guild_id) = guild_id_param(op) else {
            return fault("Invalid guild_id");
        };
        if data.broken_members.contains(&guild_id) {
            return fault("database is locked");
        }
        let inner: String = data
            .members
            .iter()
            .filter(|m| m.guild_id == guild_id)
            .map(member_xml)
            .collect();
        return envelope("get_guild_members", &inner);
    }

    fault("Unknown operation")
}

// =============================================================================
// Gateway under test
// =============================================================================

pub struct TestGateway {
    router: Router,
}

impl TestGateway {
    pub fn new(rest_url: &str, soap_url: &str) -> Self {
        let http = build_http_client(Duration::from_secs(5)).expect("Should build HTTP client");
        let state = AppState::new(
            RestClient::new(http.clone(), rest_url),
            SoapClient::new(http, soap_url),
        );
        Self {
            router: build_router(state),
        }
    }

    /// Gateway with a live REST backend and a live SOAP stub
    pub async fn with_backends() -> (Self, SoapStub) {
        let rest_url = spawn_rest_backend().await;
        let soap = spawn_soap_stub().await;
        (Self::new(&rest_url, &soap.url), soap)
    }

    /// Send a request and return status + JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }
}
