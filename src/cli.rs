use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::dom::{dispatch, DomTarget};
use crate::events::EventKind;
use crate::model::Model;
use crate::sync::MemoryPersistence;
use crate::user::{User, UserProps};
use crate::view::View;
use crate::views::UserForm;

/// modelview - reactive model/view binding demo
#[derive(Parser)]
#[command(name = "modelview")]
#[command(about = "Observable models with views that re-render on change")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wire change/save subscribers to a user and trigger them
    Demo,

    /// Render the user form and optionally simulate a click
    Render(RenderArgs),

    /// Fetch a user from the configured API
    Fetch(FetchArgs),

    /// Save a user to the configured API
    Save(SaveArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Initial user name
    #[arg(long, default_value = "myname")]
    pub name: String,

    /// Initial user age
    #[arg(long, default_value = "20")]
    pub age: u32,

    /// Selector to dispatch a click on after the first render
    #[arg(long)]
    pub click: Option<String>,
}

#[derive(Args)]
pub struct FetchArgs {
    /// User id
    #[arg(long)]
    pub id: u64,
}

#[derive(Args)]
pub struct SaveArgs {
    /// User id; a new user is created when omitted
    #[arg(long)]
    pub id: Option<u64>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,
}

/// Resolve the config path and load it
pub async fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let path = match path {
        Some(path) => path,
        None => match AppConfig::default_path() {
            Some(path) => path,
            None => return Ok(AppConfig::default()),
        },
    };
    Ok(AppConfig::load_from_file(&path).await?)
}

/// Executes CLI commands against a loaded configuration
pub struct CliHandler {
    config: AppConfig,
}

impl CliHandler {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Demo => self.handle_demo(),
            Commands::Render(args) => self.handle_render(args),
            Commands::Fetch(args) => self.handle_fetch(args).await,
            Commands::Save(args) => self.handle_save(args).await,
            Commands::Config => self.handle_config(),
        }
    }

    fn handle_demo(&self) -> Result<()> {
        let user = User::build_user(
            UserProps::default().with_name("myname").with_age(20),
            &self.config.api,
        )?;

        user.on(EventKind::Change, || println!("change number one"));
        user.on(EventKind::Change, || println!("change number two"));
        user.on(EventKind::Save, || println!("save was triggered"));

        user.trigger("change");
        user.trigger("save");
        user.trigger("nonexistent");
        Ok(())
    }

    fn handle_render(&self, args: RenderArgs) -> Result<()> {
        let target = Rc::new(RefCell::new(DomTarget::new()));
        let user: Rc<User> = Rc::new(Model::new(
            UserProps::default().with_name(args.name).with_age(args.age),
            Rc::new(MemoryPersistence::<UserProps>::new()),
        ));
        let view = View::new(Rc::clone(&target), user, UserForm::new());

        view.render();
        println!("{}", target.borrow().inner_html());

        if let Some(selector) = args.click {
            let handled = dispatch(&target, &selector, "click");
            if handled == 0 {
                return Err(anyhow!("No click handler matches '{}'", selector));
            }
            println!("{}", target.borrow().inner_html());
        }

        view.detach();
        Ok(())
    }

    async fn handle_fetch(&self, args: FetchArgs) -> Result<()> {
        let user = User::build_user(UserProps::default().with_id(args.id), &self.config.api)?;
        user.fetch().await?;
        println!("{}", serde_json::to_string_pretty(&user.get_all())?);
        Ok(())
    }

    async fn handle_save(&self, args: SaveArgs) -> Result<()> {
        let attrs = UserProps {
            id: args.id,
            name: args.name,
            age: args.age,
        };
        let user = User::build_user(attrs, &self.config.api)?;
        user.on(EventKind::Save, || println!("save was triggered"));
        user.save().await?;
        Ok(())
    }

    fn handle_config(&self) -> Result<()> {
        print!("{}", self.config.to_toml()?);
        Ok(())
    }
}
