use std::{path::Path, process, sync::Arc};

use chongyan::{
    application::{
        collection::{CollectionService, EntryQuery},
        error::AppError,
        pagination::{PaginationSettings, paginate},
        reading_time::{ReadingTime, ReadingTimeEstimator},
        render::{ComrakRenderService, RenderRequest, RenderService},
        similar::similar_items,
        sitemap::SitemapService,
        stats::SiteStatsService,
    },
    config::{self, ListArgs, ReadingTimeArgs, RenderArgs, Settings, SimilarArgs, SitemapArgs},
    infra::{
        error::InfraError,
        frontmatter::{FrontMatterError, parse_document},
        store::FsContentStore,
        telemetry,
    },
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(
            source = report.source,
            error = %error,
            chain = ?report.messages,
            "application error"
        );
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(
            source = report.source,
            error = %error,
            chain = ?report.messages,
            "application error"
        );
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;
    info!(
        target = "chongyan::bootstrap",
        content_root = %settings.content.root.display(),
        production = settings.site.production,
        "configuration loaded"
    );

    let collections = collection_service(&settings);

    match cli_args.command {
        config::Command::Similar(args) => run_similar(collections, args).await,
        config::Command::ReadingTime(args) => run_reading_time(&settings, collections, args).await,
        config::Command::Stats => run_stats(&settings, collections).await,
        config::Command::List(args) => run_list(&settings, collections, args).await,
        config::Command::Render(args) => run_render(&settings, args).await,
        config::Command::Sitemap(args) => run_sitemap(&settings, collections, args).await,
        config::Command::Robots => {
            let sitemap = SitemapService::new(collections, settings.site.site_url());
            print!("{}", sitemap.robots_txt());
            Ok(())
        }
    }
}

fn collection_service(settings: &Settings) -> CollectionService {
    let store = FsContentStore::new(settings.content.root.clone());
    CollectionService::new(Arc::new(store))
}

async fn run_similar(collections: CollectionService, args: SimilarArgs) -> Result<(), AppError> {
    let current = collections
        .store()
        .load_entry(&args.collection, &args.id)
        .await?;
    let pool = collections
        .entries(&args.collection, EntryQuery::default())
        .await?;

    let mut related = similar_items(&current, &pool);
    if let Some(limit) = args.limit {
        related.truncate(limit);
    }

    print_json(&related)
}

#[derive(Debug, Serialize)]
struct ReadingTimeReport {
    #[serde(flatten)]
    time: ReadingTime,
    complexity: f64,
    display: String,
}

async fn run_reading_time(
    settings: &Settings,
    collections: CollectionService,
    args: ReadingTimeArgs,
) -> Result<(), AppError> {
    let content = match (args.file.as_deref(), args.collection, args.id) {
        (Some(path), _, _) => read_markdown_body(path).await?,
        (None, Some(collection), Some(id)) => {
            collections.store().load_entry(&collection, &id).await?.body
        }
        _ => {
            return Err(AppError::validation(
                "reading-time needs either --file or a collection and an entry id",
            ));
        }
    };

    let complexity = args.complexity.unwrap_or(settings.reading.complexity);
    let estimator = ReadingTimeEstimator::new(settings.reading.format.clone());
    let time = estimator.estimate(&content, complexity);

    print_json(&ReadingTimeReport {
        time,
        complexity,
        display: estimator.format(time),
    })
}

async fn run_stats(settings: &Settings, collections: CollectionService) -> Result<(), AppError> {
    let service = SiteStatsService::new(collections, settings.site.start_date);
    let stats = service.stats(OffsetDateTime::now_utc().date()).await?;
    print_json(&stats)
}

async fn run_list(
    settings: &Settings,
    collections: CollectionService,
    args: ListArgs,
) -> Result<(), AppError> {
    let query = EntryQuery {
        include_drafts: args.drafts,
        ..EntryQuery::sorted(args.sort)
    };
    let entries = collections.entries(&args.collection, query).await?;

    let size = settings
        .pagination
        .page_size(PaginationSettings::kind_of(&args.collection));
    let page = paginate(entries, args.page, size);

    info!(
        target = "chongyan::list",
        collection = %args.collection,
        page = page.page,
        total_pages = page.total_pages,
        "listed collection page"
    );

    print_json(&page)
}

async fn run_render(settings: &Settings, args: RenderArgs) -> Result<(), AppError> {
    let markdown = read_markdown_body(&args.file).await?;
    let request = if args.inline {
        RenderRequest::inline(markdown)
    } else {
        RenderRequest::block(markdown)
    };

    let renderer = ComrakRenderService::new(settings.render.slug_style);
    let output = renderer.render(&request)?;
    println!("{}", output.html);
    Ok(())
}

async fn run_sitemap(
    settings: &Settings,
    collections: CollectionService,
    args: SitemapArgs,
) -> Result<(), AppError> {
    let sitemap = SitemapService::new(collections, settings.site.site_url());
    let now = OffsetDateTime::now_utc();
    let xml = if args.index {
        sitemap.sitemap_index_xml(now)?
    } else {
        sitemap.sitemap_xml(now.date()).await?
    };
    println!("{xml}");
    Ok(())
}

/// The markdown body of `path`, with front matter removed when present.
async fn read_markdown_body(path: &Path) -> Result<String, AppError> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(InfraError::from)?;

    match parse_document(&source) {
        Ok((_, body)) => Ok(body),
        Err(FrontMatterError::Missing) => Ok(source),
        Err(err) => Err(AppError::validation(format!(
            "{}: {err}",
            path.display()
        ))),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(InfraError::from)?;
    println!("{json}");
    Ok(())
}
