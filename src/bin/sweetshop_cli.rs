//!
//! sweetshop CLI binary
//! --------------------
//! Interactive shell for the sweets inventory service. Authenticates against
//! the remote API, keeps a local catalog synchronized, and gates admin
//! commands on the decoded session role.

use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use sweetshop_client::catalog::{CatalogSync, Sweet, SweetDraft, SweetFilter};
use sweetshop_client::config::ClientConfig;
use sweetshop_client::identity::{
    require_admin, require_authenticated, CredentialVault, GateDecision, SessionContext, MENU_ROUTE,
};
use sweetshop_client::transport::ApiTransport;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--url <base>] [--token <jwt>]\n  {program} -h | --help\n\nFlags:\n  --url <base>     API base address (default: $SWEETSHOP_API_URL or http://localhost:8081/api)\n  --token <jwt>    Seed credential resolved at startup (default: $SWEETSHOP_TOKEN)\n  -h, --help       Show this help\n\nInteractive commands:\n  login <user> <password>                      authenticate and hold the issued credential\n  register <user> <password> [admin-key]       create an account (separate login required)\n  logout                                       drop the credential\n  whoami                                       show the decoded identity\n  list                                         fetch and show the full catalog\n  search [name] [min-price] [max-price]        filtered fetch ('-' skips the name)\n  show <id>                                    fetch one sweet by id\n  buy <id>                                     purchase one unit\n  add <name> <category> <price> <quantity>     create a sweet (admin)\n  update <id> <name> <category> <price> <qty>  replace a sweet's fields (admin)\n  delete <id>                                  remove a sweet (admin)\n  restock <id> <quantity>                      add stock (admin)\n  help                                         show this help\n  quit | exit                                  leave the shell\n\nNames are single tokens; quoting is not interpreted."
    );
}

fn main() -> Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut url_flag: Option<String> = None;
    let mut token_flag: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--url" => {
                if i + 1 >= args.len() { eprintln!("--url requires a value"); print_usage(&program); std::process::exit(2); }
                url_flag = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--token" => {
                if i + 1 >= args.len() { eprintln!("--token requires a value"); print_usage(&program); std::process::exit(2); }
                token_flag = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            unk => {
                eprintln!("Unrecognized argument: {}", unk);
                print_usage(&program);
                std::process::exit(2);
            }
        }
    }

    let mut config = ClientConfig::from_env().context("invalid configuration")?;
    if let Some(url) = url_flag.as_deref() {
        config = config.with_base_url(url).context("invalid --url value")?;
    }
    if let Some(token) = token_flag {
        config.token = Some(token);
    }

    let vault = match config.token.as_deref() {
        Some(token) => CredentialVault::with_token(token),
        None => CredentialVault::new(),
    };
    let transport = ApiTransport::new(config.base_url.clone(), vault.clone())
        .context("failed to build the HTTP client")?;
    tracing::info!(target: "sweetshop", "sweetshop CLI starting: base={}", transport.base());
    let session = SessionContext::new(transport.clone(), vault);
    let sync = CatalogSync::new(transport);

    // Resolve any seed credential before the first gate decision
    session.initialize();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    run_repl(rt, &program, session, sync)
}

fn run_repl(rt: tokio::runtime::Runtime, program: &str, session: SessionContext, mut sync: CatalogSync) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    println!("sweetshop shell. Type 'help' for commands.");
    loop {
        input.clear();
        print!("> ");
        let _ = stdout.flush();
        match stdin.read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let up = parts[0].to_uppercase();

        if up == "EXIT" || up == "QUIT" {
            break;
        }
        if up == "HELP" {
            print_usage(program);
            continue;
        }
        if up == "LOGIN" {
            if parts.len() != 3 { eprintln!("usage: login <user> <password>"); continue; }
            match rt.block_on(async { session.login(parts[1], parts[2]).await }) {
                Ok(msg) => println!("{}", msg),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        if up == "REGISTER" {
            if parts.len() < 3 || parts.len() > 4 { eprintln!("usage: register <user> <password> [admin-key]"); continue; }
            let admin_key = parts.get(3).copied();
            match rt.block_on(async { session.register(parts[1], parts[2], admin_key).await }) {
                Ok(msg) => println!("{}", msg),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        if up == "LOGOUT" {
            println!("{}", session.logout());
            continue;
        }
        if up == "WHOAMI" {
            match session.current() {
                Some(s) => println!("{} ({})", s.username, s.role.as_str()),
                None => println!("not logged in"),
            }
            continue;
        }
        if up == "LIST" {
            if !gate_authenticated(&session, MENU_ROUTE) { continue; }
            rt.block_on(async { sync.fetch(&SweetFilter::default()).await });
            match sync.last_error() {
                Some(err) => eprintln!("{}", err),
                None => print_items(sync.items()),
            }
            continue;
        }
        if up == "SEARCH" {
            if !gate_authenticated(&session, MENU_ROUTE) { continue; }
            if parts.len() > 4 { eprintln!("usage: search [name] [min-price] [max-price]"); continue; }
            let mut filter = SweetFilter::default();
            if let Some(q) = parts.get(1) {
                if *q != "-" {
                    filter.query = Some((*q).to_string());
                }
            }
            match parts.get(2).map(|v| v.parse::<f64>()) {
                Some(Ok(v)) => filter.min_price = Some(v),
                Some(Err(_)) => { eprintln!("min-price must be a number"); continue; }
                None => {}
            }
            match parts.get(3).map(|v| v.parse::<f64>()) {
                Some(Ok(v)) => filter.max_price = Some(v),
                Some(Err(_)) => { eprintln!("max-price must be a number"); continue; }
                None => {}
            }
            rt.block_on(async { sync.fetch(&filter).await });
            match sync.last_error() {
                Some(err) => eprintln!("{}", err),
                None => print_items(sync.items()),
            }
            continue;
        }
        if up == "SHOW" {
            if !gate_authenticated(&session, MENU_ROUTE) { continue; }
            let Some(id) = parse_id(&parts, "show <id>") else { continue };
            match rt.block_on(async { sync.fetch_one(id).await }) {
                Ok(sweet) => print_items(std::slice::from_ref(&sweet)),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        if up == "BUY" {
            if !gate_authenticated(&session, MENU_ROUTE) { continue; }
            let Some(id) = parse_id(&parts, "buy <id>") else { continue };
            match rt.block_on(async { sync.purchase(id).await }) {
                Ok(msg) => println!("{}", msg),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        if up == "ADD" {
            if !gate_admin(&session) { continue; }
            if parts.len() != 5 { eprintln!("usage: add <name> <category> <price> <quantity>"); continue; }
            let Some(draft) = parse_draft(&parts[1..]) else { continue };
            match rt.block_on(async { sync.create(&draft).await }) {
                Ok(msg) => println!("{}", msg),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        if up == "UPDATE" {
            if !gate_admin(&session) { continue; }
            if parts.len() != 6 { eprintln!("usage: update <id> <name> <category> <price> <quantity>"); continue; }
            let Some(id) = parse_id(&parts, "update <id> <name> <category> <price> <quantity>") else { continue };
            let Some(draft) = parse_draft(&parts[2..]) else { continue };
            match rt.block_on(async { sync.update(id, &draft).await }) {
                Ok(msg) => println!("{}", msg),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        if up == "DELETE" {
            if !gate_admin(&session) { continue; }
            let Some(id) = parse_id(&parts, "delete <id>") else { continue };
            match rt.block_on(async { sync.delete(id).await }) {
                Ok(msg) => println!("{}", msg),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        if up == "RESTOCK" {
            if !gate_admin(&session) { continue; }
            if parts.len() != 3 { eprintln!("usage: restock <id> <quantity>"); continue; }
            let Some(id) = parse_id(&parts, "restock <id> <quantity>") else { continue };
            let quantity = match parts[2].parse::<u32>() {
                Ok(q) => q,
                Err(_) => { eprintln!("quantity must be a non-negative integer"); continue; }
            };
            match rt.block_on(async { sync.restock(id, quantity).await }) {
                Ok(msg) => println!("{}", msg),
                Err(e) => eprintln!("{}", e.message()),
            }
            continue;
        }
        eprintln!("unknown command: {} (try 'help')", parts[0]);
    }
    Ok(())
}

/// Apply the authenticated gate, reporting why a command is unavailable.
fn gate_authenticated(session: &SessionContext, wanted: &str) -> bool {
    match require_authenticated(session, wanted) {
        GateDecision::Allow => true,
        GateDecision::Pending | GateDecision::Hold => {
            eprintln!("session still resolving, try again");
            false
        }
        GateDecision::RedirectToLogin { from } => {
            eprintln!("please login first (wanted: {})", from);
            false
        }
        GateDecision::RedirectToMenu => {
            eprintln!("admin access required");
            false
        }
    }
}

fn gate_admin(session: &SessionContext) -> bool {
    match require_admin(session) {
        GateDecision::Allow => true,
        GateDecision::Pending | GateDecision::Hold => {
            eprintln!("session still resolving, try again");
            false
        }
        GateDecision::RedirectToLogin { .. } | GateDecision::RedirectToMenu => {
            eprintln!("admin access required");
            false
        }
    }
}

fn parse_id(parts: &[&str], usage: &str) -> Option<i64> {
    let Some(raw) = parts.get(1) else {
        eprintln!("usage: {}", usage);
        return None;
    };
    match raw.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            eprintln!("id must be an integer");
            None
        }
    }
}

/// Parse `<name> <category> <price> <quantity>` into a draft.
fn parse_draft(fields: &[&str]) -> Option<SweetDraft> {
    let price = match fields[2].parse::<f64>() {
        Ok(p) if p >= 0.0 => p,
        _ => {
            eprintln!("price must be a non-negative number");
            return None;
        }
    };
    let quantity = match fields[3].parse::<u32>() {
        Ok(q) => q,
        Err(_) => {
            eprintln!("quantity must be a non-negative integer");
            return None;
        }
    };
    Some(SweetDraft {
        name: fields[0].to_string(),
        category: fields[1].to_string(),
        price,
        quantity,
    })
}

fn print_items(items: &[Sweet]) {
    if items.is_empty() {
        println!("(no sweets)");
        return;
    }
    println!("{:<6} {:<20} {:<14} {:>8} {:>6}", "ID", "NAME", "CATEGORY", "PRICE", "QTY");
    for s in items {
        println!("{:<6} {:<20} {:<14} {:>8.2} {:>6}", s.id, s.name, s.category, s.price, s.quantity);
    }
}
