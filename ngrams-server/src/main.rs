use std::io;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, post, web};

use clap::Parser;
use log::{error, info};
use serde::{Deserialize, Serialize};

use ngrams_core::Error;
use ngrams_core::io::read_corpus;
use ngrams_core::model::config::IndexConfig;
use ngrams_core::model::index::Index;

/// Largest text accepted by `/learn`.
const MAX_BODY: usize = 16 * 1024 * 1024;

/// HTTP service learning ngrams from posted text and babbling new text from them.
///
/// Every option can also be set with an `NGRAMS_` environment variable.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Address to bind.
	#[arg(long, env = "NGRAMS_HOST", default_value = "127.0.0.1")]
	host: String,

	/// Port to serve on.
	#[arg(short, long, env = "NGRAMS_PORT", default_value_t = 8080)]
	port: u16,

	/// Number of tokens per ngram.
	#[arg(short, long, env = "NGRAMS_N", default_value_t = 3)]
	n: usize,

	/// Keep line breaks as tokens instead of treating them as spaces.
	#[arg(long, env = "NGRAMS_KEEP_LINEBREAKS")]
	keep_linebreaks: bool,

	/// Number of tokens generated when the request sets no limit.
	#[arg(long, env = "NGRAMS_DEFAULT_LIMIT", default_value_t = 50)]
	default_limit: usize,

	/// Directory of `.txt` files to learn before serving.
	#[arg(long, env = "NGRAMS_CORPUS")]
	corpus: Option<String>,
}

/// State shared by every worker.
struct SharedData {
	index: Index,
	default_limit: usize,
}

/// Query parameters for the `/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	limit: Option<usize>,
	seed: Option<String>,
}

#[derive(Deserialize)]
struct SeekParams {
	window: String,
}

#[derive(Serialize, Deserialize)]
struct LearnResponse {
	/// Tokens found in the learned text.
	total_tokens: usize,
	/// Windows held by the index once the text is learned.
	total_windows: usize,
}

#[derive(Serialize, Deserialize)]
struct GenerateResponse {
	body: String,
	limit: usize,
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
	err: String,
}

impl ErrorResponse {
	fn new(err: impl Into<String>) -> Self {
		Self { err: err.into() }
	}
}

/// Maps an index error to a response. An empty index is the caller's
/// mistake, anything else is ours.
fn error_response(err: Error) -> HttpResponse {
	match err {
		Error::EmptyIndex => HttpResponse::BadRequest()
			.json(ErrorResponse::new("index is empty; please learn ngrams before generating.")),
		err => {
			error!("Error: {err}");
			HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
		}
	}
}

/// HTTP POST endpoint `/learn`
///
/// Indexes the raw plain-text body and reports how many tokens it held.
#[post("/learn")]
async fn post_learn(data: web::Data<SharedData>, body: String) -> impl Responder {
	if body.trim().is_empty() {
		return HttpResponse::BadRequest().json(ErrorResponse::new("Missing or empty body"));
	}

	let shared = data.clone();
	let learned = web::block(move || {
		let tokens = shared.index.parse(&body)?;
		Ok::<_, Error>((tokens.len(), shared.index.store().len()?))
	})
	.await;

	match learned {
		Ok(Ok((total_tokens, total_windows))) => HttpResponse::Ok().json(LearnResponse {
			total_tokens,
			total_windows,
		}),
		Ok(Err(e)) => error_response(e),
		Err(e) => HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string())),
	}
}

/// HTTP GET endpoint `/generate`
///
/// Babbles up to `limit` tokens, starting from the optional `seed`.
#[get("/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let GenerateParams { limit, seed } = query.into_inner();
	let limit = limit.filter(|&l| l > 0).unwrap_or(data.default_limit);
	let seed = seed.unwrap_or_default();

	let shared = data.clone();
	match web::block(move || shared.index.babble(&seed, limit)).await {
		Ok(Ok(body)) => HttpResponse::Ok().json(GenerateResponse { body, limit }),
		Ok(Err(e)) => error_response(e),
		Err(e) => HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string())),
	}
}

/// HTTP GET endpoint `/seek`
///
/// Returns the variations learned for a window.
#[get("/seek")]
async fn get_seek(data: web::Data<SharedData>, query: web::Query<SeekParams>) -> impl Responder {
	match data.index.seek(&query.window) {
		Ok(Some(result)) => HttpResponse::Ok().json(result),
		Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("Unknown window")),
		Err(e) => error_response(e),
	}
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.app_data(web::PayloadConfig::new(MAX_BODY))
		.service(post_learn)
		.service(get_generated)
		.service(get_seek);
}

/// Main entry point for the server.
///
/// Builds the index, optionally trains it on a corpus directory, then serves
/// it until interrupted. The index is closed once the server stops.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let config = IndexConfig {
		n: args.n,
		strip_linebreaks: !args.keep_linebreaks,
	};
	info!("Starting ngram service with {config:?}");
	let index = Index::from_config(&config);

	if let Some(corpus) = &args.corpus {
		let texts = read_corpus(corpus)?;
		let tokens = index.parse_all(&texts).map_err(io::Error::other)?;
		info!("Learned {} files ({} tokens) from {}", texts.len(), tokens, corpus);
	}

	let shared = web::Data::new(SharedData {
		index,
		default_limit: args.default_limit,
	});

	info!("Listening on {}:{}", args.host, args.port);
	let app_data = shared.clone();
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(app_data.clone())
			.configure(routes)
	})
	.bind((args.host.as_str(), args.port))?
	.run()
	.await?;

	info!("Shutting down");
	shared.index.close().map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use actix_web::http::StatusCode;
	use actix_web::test;

	use super::*;

	#[derive(Deserialize)]
	struct SeekBody {
		prefix: String,
		next: HashMap<String, u64>,
	}

	fn shared() -> web::Data<SharedData> {
		web::Data::new(SharedData {
			index: Index::from_config(&IndexConfig::default()),
			default_limit: 50,
		})
	}

	#[actix_web::test]
	async fn test_generate_empty_index() {
		let app = test::init_service(App::new().app_data(shared()).configure(routes)).await;

		let req = test::TestRequest::get().uri("/generate").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

		let body: ErrorResponse = test::read_body_json(resp).await;
		assert_eq!(body.err, "index is empty; please learn ngrams before generating.");
	}

	#[actix_web::test]
	async fn test_learn_empty_body() {
		let app = test::init_service(App::new().app_data(shared()).configure(routes)).await;

		let req = test::TestRequest::post().uri("/learn").set_payload(" \n ").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_learn_then_generate() {
		let app = test::init_service(App::new().app_data(shared()).configure(routes)).await;

		let req = test::TestRequest::post()
			.uri("/learn")
			.set_payload("to be or not to be that is the question")
			.to_request();
		let learned: LearnResponse = test::call_and_read_body_json(&app, req).await;
		assert_eq!(learned.total_tokens, 10);
		assert_eq!(learned.total_windows, 7);

		// The count covers the whole index, not only the last request.
		let req = test::TestRequest::post().uri("/learn").set_payload("the question remains").to_request();
		let learned: LearnResponse = test::call_and_read_body_json(&app, req).await;
		assert_eq!(learned.total_tokens, 3);
		assert_eq!(learned.total_windows, 8);

		let req = test::TestRequest::get().uri("/generate?limit=5&seed=to%20be").to_request();
		let generated: GenerateResponse = test::call_and_read_body_json(&app, req).await;
		assert_eq!(generated.limit, 5);
		assert!(generated.body.starts_with("To be "), "{}", generated.body);

		let req = test::TestRequest::get().uri("/generate").to_request();
		let generated: GenerateResponse = test::call_and_read_body_json(&app, req).await;
		assert_eq!(generated.limit, 50);
		assert!(!generated.body.is_empty());
	}

	#[actix_web::test]
	async fn test_seek() {
		let app = test::init_service(App::new().app_data(shared()).configure(routes)).await;

		let req = test::TestRequest::post()
			.uri("/learn")
			.set_payload("to be or not to be that is the question")
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert!(resp.status().is_success());

		let req = test::TestRequest::get().uri("/seek?window=to%20be").to_request();
		let found: SeekBody = test::call_and_read_body_json(&app, req).await;
		assert_eq!(found.prefix, "be");
		assert_eq!(found.next, HashMap::from([("or".to_owned(), 1), ("that".to_owned(), 1)]));

		let req = test::TestRequest::get().uri("/seek?window=not%20learned").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	}
}
