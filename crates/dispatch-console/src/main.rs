//! dispatch-console command line

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dispatch_client::ApiClient;
use dispatch_console::actions::{self, ProductPatch};
use dispatch_console::auth::{self, VendorRegistration};
use dispatch_console::confirm::prompt_line;
use dispatch_console::views::{
    system_clock, AdminDashboard, AdminOrders, AdminVendors, Catalog, CatalogPage, Earnings,
    KitchenBoard, Partners, VendorDashboard, VendorsPage,
};
use dispatch_console::{
    render, watch, AssumeYes, Confirm, ConsoleConfig, ConsoleError, OutputFormat, Portal, Render,
    SessionContext, SessionStore, SharedApi, TerminalPrompt, ViewKind, WatchOptions,
};
use dispatch_model::{
    Credentials, OrderId, ProductDraft, ProductId, RegistrationDetails, ServiceType, VendorId,
};
use dispatch_stats::{order_board, summarize_vendors};
use dispatch_sync::{PollerConfig, Refresh};
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Admin and vendor console for the dispatch delivery platform
#[derive(Debug, Parser)]
#[command(name = "dispatch-console", version, about)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true, env = "DISPATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overriding settings and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in to a portal
    Login(LoginArgs),
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new vendor
    Signup(SignupArgs),
    /// Platform administration
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Vendor self-service
    #[command(subcommand)]
    Vendor(VendorCommand),
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Portal to enter
    #[arg(long, value_enum)]
    portal: Portal,

    /// Account email, for password sign-in
    #[arg(long, conflicts_with = "phone", required_unless_present = "phone")]
    email: Option<String>,

    /// Account password; prompted when omitted
    #[arg(long, env = "DISPATCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Account phone, for one-time-code sign-in
    #[arg(long)]
    phone: Option<String>,

    /// One-time code; requested and prompted when omitted
    #[arg(long, requires = "phone")]
    otp: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServiceArg {
    Food,
    Logistics,
}

impl From<ServiceArg> for ServiceType {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Food => Self::Food,
            ServiceArg::Logistics => Self::Logistics,
        }
    }
}

#[derive(Debug, Args)]
struct SignupArgs {
    /// Owner name
    #[arg(long)]
    full_name: String,
    /// Login email
    #[arg(long)]
    email: String,
    /// Login password; prompted when omitted
    #[arg(long, env = "DISPATCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Phone the verification code is sent to
    #[arg(long)]
    phone: String,
    /// Trading name
    #[arg(long)]
    business_name: String,
    /// Kind of business
    #[arg(long, value_enum, default_value_t = ServiceArg::Food)]
    service_type: ServiceArg,
    /// About the business
    #[arg(long, default_value = "")]
    description: String,
    /// City of operation
    #[arg(long)]
    city: String,
    /// FSSAI licence number
    #[arg(long, default_value = "")]
    fssai_license: String,
    /// GST number
    #[arg(long, default_value = "")]
    gst_number: String,
    /// Logo image URL
    #[arg(long, default_value = "")]
    logo_url: String,
    /// Verification code; prompted when omitted
    #[arg(long)]
    otp: Option<String>,
}

#[derive(Debug, Clone, Copy, Args)]
struct ViewArgs {
    /// Keep polling and redraw until Ctrl-C
    #[arg(long)]
    watch: bool,
    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    fn format(self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Debug, Clone, Copy, Args)]
struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl ConfirmArgs {
    fn gate(self) -> Box<dyn Confirm> {
        if self.yes {
            Box::new(AssumeYes)
        } else {
            Box::new(TerminalPrompt)
        }
    }
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Platform overview
    Dashboard(ViewArgs),
    /// Every order on the platform
    Orders(ViewArgs),
    /// Vendor list
    Vendors {
        #[command(flatten)]
        view: ViewArgs,
        /// Filter by name or cuisine
        #[arg(long)]
        search: Option<String>,
    },
    /// Approve a pending vendor
    Approve {
        /// Vendor id
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// Delete a vendor
    DeleteVendor {
        /// Vendor id
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
    /// Delivery fleet
    Partners(ViewArgs),
}

#[derive(Debug, Subcommand)]
enum VendorCommand {
    /// Store overview
    Dashboard(ViewArgs),
    /// Kitchen board
    Orders(ViewArgs),
    /// Move an order to its next kitchen status
    Advance {
        /// Order id
        id: String,
    },
    /// Earnings and recent transactions
    Earnings(ViewArgs),
    /// Delivery fleet
    Partners(ViewArgs),
    /// Products on sale
    Catalog {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product
    AddProduct(ProductArgs),
    /// Change fields of a product
    EditProduct {
        /// Product id
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    DeleteProduct {
        /// Product id
        id: String,
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Display name
    #[arg(long)]
    name: String,
    /// Unit price
    #[arg(long)]
    price: f64,
    /// Menu section
    #[arg(long)]
    category: String,
    /// Long description
    #[arg(long, default_value = "")]
    description: String,
    /// Photo URL
    #[arg(long, default_value = "")]
    image_url: String,
}

#[derive(Debug, Args)]
struct ProductFields {
    /// New name
    #[arg(long)]
    name: Option<String>,
    /// New price
    #[arg(long)]
    price: Option<f64>,
    /// New category
    #[arg(long)]
    category: Option<String>,
    /// New description
    #[arg(long)]
    description: Option<String>,
    /// New photo URL
    #[arg(long)]
    image_url: Option<String>,
}

impl From<ProductFields> for ProductPatch {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            price: fields.price,
            category: fields.category,
            description: fields.description,
            image_url: fields.image_url,
        }
    }
}

struct App {
    config: ConsoleConfig,
    api: SharedApi,
    store: SessionStore,
}

impl App {
    fn new(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = ConsoleConfig::load(cli.config.as_deref()).map_err(ConsoleError::from)?;
        if let Some(url) = &cli.api_url {
            config.api_url.clone_from(url);
            config.validate().map_err(ConsoleError::from)?;
        }
        debug!(api_url = %config.api_url, session = %config.session_file.display(), "settings loaded");

        let api: SharedApi = Arc::new(ApiClient::new(config.api_config()));
        let store = SessionStore::new(config.session_file.clone());
        Ok(Self { config, api, store })
    }

    fn session(&self, portal: Portal) -> anyhow::Result<SessionContext> {
        let session = self.store.require()?;
        session.require(portal)?;
        Ok(session)
    }

    fn poll(&self, view: ViewKind) -> PollerConfig {
        PollerConfig::every(self.config.poll.for_view(view))
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .init(),
    }
}

fn print<P: Render + Serialize + ?Sized>(page: &P, format: OutputFormat) -> anyhow::Result<()> {
    print!("{}", render(page, format)?);
    Ok(())
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn show<R>(view: R, poll: PollerConfig, args: ViewArgs) -> anyhow::Result<()>
where
    R: Refresh,
    R::Output: Render + Serialize,
{
    let format = args.format();
    if args.watch {
        let options = WatchOptions {
            format,
            clear_screen: format == OutputFormat::Text && io::stdout().is_terminal(),
        };
        let mut stdout = io::stdout();
        watch(view, poll, options, &mut stdout, ctrl_c()).await?;
    } else {
        once(&view, format).await?;
    }
    Ok(())
}

async fn once<R>(view: &R, format: OutputFormat) -> anyhow::Result<()>
where
    R: Refresh,
    R::Output: Render + Serialize,
{
    let page = view
        .refresh()
        .await
        .map_err(ConsoleError::from)
        .with_context(|| format!("loading {}", view.name()))?;
    print(&page, format)
}

fn secret(given: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(prompt_line(prompt).map_err(ConsoleError::from)?),
    }
}

async fn login(app: &App, args: LoginArgs) -> anyhow::Result<()> {
    let credentials = match (args.email, args.phone) {
        (Some(email), _) => Credentials::Password {
            password: secret(args.password, "Password: ")?,
            email,
        },
        (None, Some(phone)) => {
            let otp = match args.otp {
                Some(otp) => otp,
                None => {
                    auth::send_login_code(app.api.as_ref(), &phone).await?;
                    secret(None, "Code: ")?
                }
            };
            Credentials::Otp { phone, otp }
        }
        (None, None) => anyhow::bail!("pass --email or --phone"),
    };

    let session = auth::login(app.api.as_ref(), args.portal, &credentials).await?;
    app.store.save(&session).map_err(ConsoleError::from)?;
    print!("Signed in as {}", session.render_text());
    Ok(())
}

async fn signup(app: &App, args: SignupArgs) -> anyhow::Result<()> {
    let registration = VendorRegistration {
        full_name: args.full_name,
        email: args.email,
        password: secret(args.password, "Password: ")?,
        phone: args.phone,
        business_name: args.business_name,
        service_type: args.service_type.into(),
        details: RegistrationDetails {
            description: args.description,
            city: args.city,
            fssai_license: args.fssai_license,
            gst_number: args.gst_number,
        },
        logo_url: args.logo_url,
    };

    auth::start_signup(app.api.as_ref(), &registration).await?;
    let otp = secret(args.otp, "Verification code: ")?;
    auth::complete_signup(app.api.as_ref(), &registration, &otp).await?;
    println!("Registered {}; sign in with `dispatch-console login --portal vendor`", registration.business_name);
    Ok(())
}

async fn admin(app: &App, command: AdminCommand) -> anyhow::Result<()> {
    app.session(Portal::Admin)?;
    let api = &app.api;
    match command {
        AdminCommand::Dashboard(view) => {
            show(AdminDashboard::new(Arc::clone(api)), app.poll(ViewKind::Dashboard), view).await
        }
        AdminCommand::Orders(view) => {
            show(AdminOrders::new(Arc::clone(api)), app.poll(ViewKind::Orders), view).await
        }
        AdminCommand::Vendors { view, search } => {
            show(AdminVendors::new(Arc::clone(api), search), app.poll(ViewKind::Vendors), view).await
        }
        AdminCommand::Partners(view) => {
            show(Partners::new(Arc::clone(api)), app.poll(ViewKind::Partners), view).await
        }
        AdminCommand::Approve { id, confirm } => {
            let vendors =
                actions::approve_vendor(api.as_ref(), confirm.gate().as_ref(), &VendorId::new(id)).await?;
            print(&vendors_page(vendors), OutputFormat::Text)
        }
        AdminCommand::DeleteVendor { id, confirm } => {
            let vendors =
                actions::delete_vendor(api.as_ref(), confirm.gate().as_ref(), &VendorId::new(id)).await?;
            print(&vendors_page(vendors), OutputFormat::Text)
        }
    }
}

fn vendors_page(vendors: Vec<dispatch_model::Vendor>) -> VendorsPage {
    VendorsPage {
        summary: summarize_vendors(&vendors),
        vendors,
    }
}

async fn vendor(app: &App, command: VendorCommand) -> anyhow::Result<()> {
    let session = app.session(Portal::Vendor)?;
    let scope = session.vendor_scope();
    let api = &app.api;
    match command {
        VendorCommand::Dashboard(view) => {
            show(
                VendorDashboard::new(Arc::clone(api), &session.user),
                app.poll(ViewKind::Dashboard),
                view,
            )
            .await
        }
        VendorCommand::Orders(view) => {
            show(KitchenBoard::new(Arc::clone(api), scope), app.poll(ViewKind::Orders), view).await
        }
        VendorCommand::Earnings(view) => {
            show(
                Earnings::new(Arc::clone(api), scope, system_clock()),
                app.poll(ViewKind::Earnings),
                view,
            )
            .await
        }
        VendorCommand::Partners(view) => {
            show(Partners::new(Arc::clone(api)), app.poll(ViewKind::Partners), view).await
        }
        VendorCommand::Catalog { json } => {
            let format = ViewArgs { watch: false, json }.format();
            once(&Catalog::new(Arc::clone(api), scope), format).await
        }
        VendorCommand::Advance { id } => {
            let advanced = actions::advance_order(api.as_ref(), &scope, &OrderId::new(id)).await?;
            print(&advanced, OutputFormat::Text)?;
            print(&order_board(&advanced.orders), OutputFormat::Text)
        }
        VendorCommand::AddProduct(args) => {
            let draft = ProductDraft::new(scope, args.name, args.price, args.category)
                .with_description(args.description)
                .with_image_url(args.image_url);
            let products = actions::create_product(api.as_ref(), &draft).await?;
            print(&CatalogPage { products }, OutputFormat::Text)
        }
        VendorCommand::EditProduct { id, fields } => {
            let patch = ProductPatch::from(fields);
            if patch.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field");
            }
            let products =
                actions::edit_product(api.as_ref(), &scope, &ProductId::new(id), patch).await?;
            print(&CatalogPage { products }, OutputFormat::Text)
        }
        VendorCommand::DeleteProduct { id, confirm } => {
            let products = actions::delete_product(
                api.as_ref(),
                confirm.gate().as_ref(),
                &scope,
                &ProductId::new(id),
            )
            .await?;
            print(&CatalogPage { products }, OutputFormat::Text)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = App::new(&cli)?;
    match cli.command {
        Command::Login(args) => login(&app, args).await,
        Command::Logout => {
            if app.store.clear().map_err(ConsoleError::from)? {
                println!("Signed out");
            } else {
                println!("Not signed in");
            }
            Ok(())
        }
        Command::Whoami { json } => {
            let session = app.store.require()?;
            let format = if json { OutputFormat::Json } else { OutputFormat::Text };
            print(&session, format)
        }
        Command::Signup(args) => signup(&app, args).await,
        Command::Admin(command) => admin(&app, command).await,
        Command::Vendor(command) => vendor(&app, command).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let console = err.downcast_ref::<ConsoleError>();
            if console.is_some_and(ConsoleError::is_cancelled) {
                eprintln!("Cancelled");
                return ExitCode::SUCCESS;
            }
            eprintln!("error: {err:#}");
            ExitCode::from(console.map_or(1, ConsoleError::exit_code))
        }
    }
}
