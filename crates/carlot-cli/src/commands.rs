use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use carlot_auth::{Credentials, TokenIssuer, TokenKey};
use carlot_sdk::{
    ApiClient, CandidateImage, ClientConfig, ImagePicker, ListingEditor, ListingForm, Rejection,
    Session, Uploader,
};
use carlot_server::{CarlotServer, ServerConfig};
use carlot_types::{Listing, Subject};
use colored::Colorize;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Token(args) => cmd_token(args),
        Command::Login(args) => cmd_login(args),
        Command::Logout => cmd_logout(),
        Command::Whoami => cmd_whoami(),
        Command::List(args) => cmd_list(&connect(cli.config)?, args, format).await,
        Command::Show(args) => cmd_show(&connect(cli.config)?, args, format).await,
        Command::Create(args) => cmd_create(&connect(cli.config)?, args).await,
        Command::Edit(args) => cmd_edit(&connect(cli.config)?, args).await,
        Command::Delete(args) => cmd_delete(&connect(cli.config)?, args).await,
    }
}

fn session_path() -> anyhow::Result<PathBuf> {
    Session::default_path().context("no user configuration directory available")
}

fn connect(config_path: Option<PathBuf>) -> anyhow::Result<ListingEditor> {
    let config = match config_path.or_else(ClientConfig::default_path) {
        Some(path) => ClientConfig::load_or_default(&path)?,
        None => ClientConfig::default(),
    };
    let session = Session::resolve(Session::default_path().as_deref())?;
    let credentials = session
        .as_ref()
        .map(Session::credentials)
        .unwrap_or(Credentials::Anonymous);
    tracing::debug!(api = %config.api_url, signed_in = session.is_some(), "connecting");

    let api = ApiClient::new(&config.api_url, credentials)?;
    let uploader = Uploader::new(config.blob_store()).with_concurrency(config.upload_concurrency);
    Ok(ListingEditor::new(api, uploader, session))
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.server_config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let server = CarlotServer::from_config(config).await?;
    server.serve().await?;
    Ok(())
}

fn cmd_token(args: TokenArgs) -> anyhow::Result<()> {
    match args.action {
        TokenAction::Keygen => println!("{}", TokenKey::generate().to_hex()),
        TokenAction::Issue { subject, secret } => {
            let key = TokenKey::from_hex(&secret)?;
            let subject = Subject::new(subject)?;
            println!("{}", TokenIssuer::new(key).issue(&subject));
        }
    }
    Ok(())
}

fn cmd_login(args: LoginArgs) -> anyhow::Result<()> {
    let session = Session::from_token(args.token)?;
    session.save(&session_path()?)?;
    println!("{} Signed in as {}", "✓".green().bold(), session.subject().to_string().bold());
    Ok(())
}

fn cmd_logout() -> anyhow::Result<()> {
    if Session::clear(&session_path()?)? {
        println!("{} Signed out", "✓".green().bold());
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

fn cmd_whoami() -> anyhow::Result<()> {
    match Session::resolve(Session::default_path().as_deref())? {
        Some(session) => println!("{}", session.subject().to_string().bold()),
        None => println!("Not signed in."),
    }
    Ok(())
}

fn print_summary(listing: &Listing) {
    println!(
        "{}  {}  {}",
        listing.id.short_id().yellow(),
        listing.title.bold(),
        listing.tags.join(", ").cyan()
    );
}

async fn cmd_list(editor: &ListingEditor, args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let listings = if args.mine {
        editor.my_listings(&args.search).await?
    } else {
        editor.browse(&args.search).await?
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }
    if listings.is_empty() {
        if args.search.is_empty() {
            println!("No cars listed yet.");
        } else {
            println!("No cars match {}.", args.search.bold());
        }
        return Ok(());
    }
    for listing in &listings {
        print_summary(listing);
    }
    Ok(())
}

async fn cmd_show(editor: &ListingEditor, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let listing = editor.view(&args.id).await?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("{}", listing.title.bold());
    println!("  Id: {}", listing.id.to_string().yellow());
    println!("  Owner: {}", listing.owner_id);
    println!("  Listed: {}", listing.created_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(updated) = listing.updated_at {
        println!("  Updated: {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }
    if !listing.tags.is_empty() {
        println!("  Tags: {}", listing.tags.join(", ").cyan());
    }
    println!("\n{}\n", listing.description);
    match listing.cover_image() {
        Some(cover) => println!("  [0] {} {}", cover.blue(), "(cover)".dimmed()),
        None => println!("  {}", "No images".dimmed()),
    }
    for (i, url) in listing.images.iter().enumerate().skip(1) {
        println!("  [{i}] {}", url.blue());
    }

    if editor.session().is_some_and(|s| s.owns(&listing)) {
        println!(
            "\n  {}  carlot edit {}    carlot delete {}",
            "Owner actions:".dimmed(),
            listing.id,
            listing.id
        );
    }
    Ok(())
}

fn report_rejections(rejections: &[Rejection]) {
    for rejection in rejections {
        eprintln!("{} {}", format!("{}:", rejection.title()).red().bold(), rejection);
    }
}

/// Read `paths` and add them to `picker`. Any rejected file aborts the
/// command so a listing is never submitted with part of its images.
async fn pick(picker: &mut ImagePicker, paths: &[PathBuf]) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = CandidateImage::from_path(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        files.push(file);
    }
    let rejections = picker.add(files);
    if !rejections.is_empty() {
        report_rejections(&rejections);
        bail!("{} image(s) rejected; nothing was submitted", rejections.len());
    }
    Ok(())
}

async fn cmd_create(editor: &ListingEditor, args: CreateArgs) -> anyhow::Result<()> {
    let form = ListingForm::new(args.title, args.description, args.tags);
    let mut picker = ImagePicker::new();
    pick(&mut picker, &args.images).await?;

    let id = editor.create(&form, picker).await?;
    println!("{} Car listed successfully: {}", "✓".green().bold(), id.yellow());
    Ok(())
}

async fn cmd_edit(editor: &ListingEditor, args: EditArgs) -> anyhow::Result<()> {
    let (_, mut form, mut picker) = editor.open_for_edit(&args.id).await?;

    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(tags) = args.tags {
        form.tags = tags;
    }

    // Highest index first so earlier removals don't shift later ones.
    let mut removals = args.remove_images;
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        if picker.remove_existing(index).is_none() {
            bail!("listing has no image at position {index}");
        }
    }
    pick(&mut picker, &args.add_images).await?;

    editor.update(&args.id, &form, picker).await?;
    println!("{} Car updated successfully", "✓".green().bold());
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn cmd_delete(editor: &ListingEditor, args: DeleteArgs) -> anyhow::Result<()> {
    if !args.yes
        && !confirm("Are you sure you want to delete this car? This action cannot be undone.")?
    {
        println!("Cancelled.");
        return Ok(());
    }
    editor.delete(&args.id).await?;
    println!("{} Car deleted successfully", "✓".green().bold());
    Ok(())
}
