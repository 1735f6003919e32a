//! Local server capturing authentication artifacts from the browser.
//!
//! `GET /auth` serves a page that posts `{ "authSig": ..., "pkpPublicKey": ... }`
//! to `POST /api`. The first well-formed post is handed to the caller and
//! ends the loop; malformed posts are answered with a 400 and the server
//! keeps listening.

use anyhow::anyhow;
use serde::Deserialize;
use serde_json::{json, Value};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::actions::templates;
use crate::error::Result;
use crate::workspace::Credentials;

/// Page served at `/auth`.
const AUTH_PAGE: &str = "auth/auth.html";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CapturePayload {
    #[serde(default)]
    auth_sig: Value,
    #[serde(default)]
    pkp_public_key: String,
}

impl CapturePayload {
    fn into_credentials(self) -> std::result::Result<Credentials, String> {
        if self.auth_sig.is_null() {
            return Err("authSig is required".to_string());
        }
        if self.pkp_public_key.trim().is_empty() {
            return Err("pkpPublicKey is required".to_string());
        }
        Ok(Credentials {
            auth_sig: self.auth_sig,
            pkp_public_key: self.pkp_public_key.trim().to_string(),
        })
    }
}

/// What to do after one request.
enum Outcome {
    Continue,
    Captured(Credentials),
}

/// A bound capture server.
pub struct AuthServer {
    server: Server,
    port: u16,
}

impl AuthServer {
    /// Bind on `127.0.0.1:<port>`; port 0 picks a free one.
    pub fn bind(port: u16) -> Result<Self> {
        let addr = format!("127.0.0.1:{}", port);
        let server = Server::http(&addr).map_err(|e| anyhow!("Cannot listen on {}: {}", addr, e))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .ok_or_else(|| anyhow!("Unable to determine bound port for {}", addr))?;

        Ok(Self { server, port })
    }

    /// The port actually bound.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// URL of the capture page.
    pub fn auth_url(&self) -> String {
        format!("http://localhost:{}/auth", self.port)
    }

    /// Serve requests until a valid capture arrives.
    ///
    /// `persist` runs before the browser gets its answer, so a failure to
    /// save is reported to both sides.
    pub fn serve<F>(&self, mut persist: F) -> Result<Credentials>
    where
        F: FnMut(&Credentials) -> Result<String>,
    {
        loop {
            let request = self.server.recv()?;
            match self.handle(request, &mut persist)? {
                Outcome::Continue => continue,
                Outcome::Captured(credentials) => return Ok(credentials),
            }
        }
    }

    fn handle<F>(&self, mut request: Request, persist: &mut F) -> Result<Outcome>
    where
        F: FnMut(&Credentials) -> Result<String>,
    {
        let method = request.method().clone();
        let path = request.url().split('?').next().unwrap_or("").to_string();
        tracing::debug!("{} {}", method, path);

        match (method, path.as_str()) {
            (Method::Get, "/auth") | (Method::Get, "/") => {
                let page = templates::embedded_text(AUTH_PAGE)?;
                respond(request, 200, "text/html; charset=utf-8", page.to_string());
                Ok(Outcome::Continue)
            }
            (Method::Post, "/api") => {
                let mut body = String::new();
                if let Err(e) = request.as_reader().read_to_string(&mut body) {
                    respond_json(request, 400, &format!("Unreadable body: {}", e));
                    return Ok(Outcome::Continue);
                }

                let credentials = serde_json::from_str::<CapturePayload>(&body)
                    .map_err(|e| e.to_string())
                    .and_then(CapturePayload::into_credentials);

                match credentials {
                    Ok(credentials) => match persist(&credentials) {
                        Ok(message) => {
                            respond_json(request, 200, &message);
                            Ok(Outcome::Captured(credentials))
                        }
                        Err(e) => {
                            respond_json(request, 500, &e.to_string());
                            Err(e)
                        }
                    },
                    Err(message) => {
                        respond_json(request, 400, &message);
                        Ok(Outcome::Continue)
                    }
                }
            }
            _ => {
                respond(request, 404, "text/plain", "Not Found".to_string());
                Ok(Outcome::Continue)
            }
        }
    }
}

fn respond(request: Request, status: u16, content_type: &str, body: String) {
    let mut response = Response::from_string(body).with_status_code(status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        tracing::debug!("Failed to answer request: {}", e);
    }
}

fn respond_json(request: Request, status: u16, message: &str) {
    let body = json!({ "message": message }).to_string();
    respond(request, status, "application/json", body);
}
