use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pitkit_build::{
    plan_invocation, run_invocation, BuildInvocation, CommandComposer, ComposeSettings,
    DefaultCommandRunner,
};
use pitkit_config::{
    init_tracing, load_for_workspace, ActionSettings, ActionStore, PitkitConfig, TomlActionStore,
};
use pitkit_model::{BuildSystem, BuildUnit, BuildUnitTree, CodeType, MutationCoverageOptions};
use pitkit_project::{BuildUnitStore, FsWorkspace, SourceFolderCatalog};
use pitkit_resolve::{FsSyntaxIndex, LanguageAdapters, MutationCoverageResolver, ResolveError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "pitkit",
    version,
    about = "Run PIT mutation coverage for selected Java/Kotlin packages and classes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Maven/Gradle build-unit hierarchy of a project
    Units(UnitsArgs),
    /// Resolve selected files/directories into PIT targets and a build command
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct UnitsArgs {
    /// Project root (defaults to current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ResolveArgs {
    /// Source files or package directories to run mutation coverage on
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Project root (defaults to current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Goals/tasks to run before the mutation goal (overrides saved actions)
    #[arg(long)]
    pre: Option<String>,
    /// Goals/tasks to run after the mutation goal (overrides saved actions)
    #[arg(long)]
    post: Option<String>,
    /// Persist the pre/post actions for this project
    #[arg(long)]
    save_actions: bool,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
    /// Run the composed command
    #[arg(long)]
    execute: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Units(args) => {
            let session = Session::open(&args.root)?;
            let report = UnitsReport::new(&session.tree);
            if args.json {
                print_json(&report)?;
            } else {
                print_units(&session.tree);
            }
            Ok(0)
        }
        Command::Resolve(args) => resolve(args),
    }
}

/// Loaded configuration and the scanned build-unit tree for one project root.
struct Session {
    root: PathBuf,
    config: PitkitConfig,
    tree: Arc<BuildUnitTree>,
}

impl Session {
    fn open(root: &Path) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("failed to open project root {}", root.display()))?;
        let (config, config_path) = load_for_workspace(&root)
            .with_context(|| format!("failed to load config for {}", root.display()))?;
        init_tracing(&config.logging);
        if let Some(path) = config_path {
            tracing::debug!(target: "pitkit.config", path = %path.display(), "using config file");
        }

        let workspace = FsWorkspace::discover(&root)?;
        let catalog =
            SourceFolderCatalog::with_generated_markers(config.generated_sources.markers.clone());
        let tree = BuildUnitStore::new().clean_scan(&workspace, &catalog);

        Ok(Self { root, config, tree })
    }

    fn syntax_index(&self) -> FsSyntaxIndex {
        FsSyntaxIndex::new(
            self.tree
                .iter()
                .flat_map(|unit| unit.source_folders.iter().map(|folder| folder.path.clone())),
        )
    }
}

fn resolve(args: ResolveArgs) -> Result<i32> {
    let session = Session::open(&args.root)?;
    let store = TomlActionStore;

    let mut saved = store
        .load(&session.root)
        .context("failed to load saved actions")?;
    if let Some(pre) = args.pre {
        saved.pre_actions = pre;
    }
    if let Some(post) = args.post {
        saved.post_actions = post;
    }

    let paths = args
        .paths
        .iter()
        .map(|path| {
            path.canonicalize()
                .with_context(|| format!("failed to resolve {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let index = session.syntax_index();
    let adapters = LanguageAdapters::default();
    let options = match MutationCoverageResolver::new(&session.tree, &index, &adapters)
        .resolve(&paths, &saved)
    {
        Ok(options) => options,
        Err(err) => return Ok(report_structural(&err)),
    };

    let composer = CommandComposer::new(
        &session.tree,
        ComposeSettings {
            compile_tests_first: session.config.maven.compile_tests_first,
        },
    );
    let command = composer.compose(&options, options.build_system);
    let invocation = plan_invocation(&options, &session.tree, &session.config)?;

    let report = ResolveReport::new(&session.tree, &options, command, &invocation);
    if args.json {
        print_json(&report)?;
    } else {
        print_resolution(&report);
    }

    if args.save_actions || args.execute {
        store
            .save(
                &session.root,
                &ActionSettings {
                    pre_actions: options.pre_actions.clone(),
                    post_actions: options.post_actions.clone(),
                },
            )
            .context("failed to save actions")?;
    }

    if args.execute {
        let runner = DefaultCommandRunner::with_timeout(session.config.build.timeout());
        let output = run_invocation(&invocation, &runner)?;
        // Keep stdout parseable when --json is combined with --execute.
        if args.json {
            eprint!("{}", output.stdout);
        } else {
            print!("{}", output.stdout);
        }
        eprint!("{}", output.stderr);
    }

    Ok(0)
}

fn report_structural(err: &ResolveError) -> i32 {
    match err {
        ResolveError::NoBuildSystem => eprintln!("error: {err}"),
        ResolveError::NothingSelected { errors } => {
            eprintln!("error: nothing selected");
            for error in errors {
                eprintln!("  {error}");
            }
        }
    }
    1
}

#[derive(Serialize)]
struct UnitsReport {
    units: Vec<UnitReport>,
}

#[derive(Serialize)]
struct UnitReport {
    name: String,
    build_system: BuildSystem,
    descriptor: PathBuf,
    parent: Option<String>,
    /// Gradle project path (`:app`); omitted for Maven units.
    #[serde(skip_serializing_if = "Option::is_none")]
    project_path: Option<String>,
    source_folders: Vec<FolderReport>,
}

#[derive(Serialize)]
struct FolderReport {
    path: PathBuf,
    code_type: CodeType,
}

impl UnitsReport {
    fn new(tree: &BuildUnitTree) -> Self {
        let units = tree
            .iter()
            .map(|unit| UnitReport {
                name: unit.name.clone(),
                build_system: unit.build_system,
                descriptor: unit.descriptor_path.clone(),
                parent: tree.parent(unit.id).map(|parent| parent.name.clone()),
                project_path: (unit.build_system == BuildSystem::Gradle)
                    .then(|| tree.gradle_project_path(unit.id)),
                source_folders: unit
                    .source_folders
                    .iter()
                    .map(|folder| FolderReport {
                        path: folder.path.clone(),
                        code_type: folder.code_type,
                    })
                    .collect(),
            })
            .collect();
        Self { units }
    }
}

#[derive(Serialize)]
struct ResolveReport {
    build_system: BuildSystem,
    working_unit: String,
    working_dir: PathBuf,
    target_classes: String,
    target_tests: String,
    pre_actions: String,
    post_actions: String,
    errors: Vec<String>,
    command: String,
    invocation: BuildInvocation,
}

impl ResolveReport {
    fn new(
        tree: &BuildUnitTree,
        options: &MutationCoverageOptions,
        command: String,
        invocation: &BuildInvocation,
    ) -> Self {
        Self {
            build_system: options.build_system,
            working_unit: tree
                .get(options.working_unit)
                .map(|unit| unit.name.clone())
                .unwrap_or_default(),
            working_dir: invocation.working_dir.clone(),
            target_classes: options.target_classes.clone(),
            target_tests: options.target_tests.clone(),
            pre_actions: options.pre_actions.clone(),
            post_actions: options.post_actions.clone(),
            errors: options.errors.clone(),
            command,
            invocation: invocation.clone(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

fn print_units(tree: &BuildUnitTree) {
    if tree.is_empty() {
        println!("no build units found");
        return;
    }
    for root in tree.roots() {
        print_unit(tree, root, 0);
    }
}

fn print_unit(tree: &BuildUnitTree, unit: &BuildUnit, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} [{}] {}",
        unit.name,
        unit.build_system,
        unit.descriptor_path.display()
    );
    for folder in &unit.source_folders {
        let relative = folder
            .path
            .strip_prefix(unit.directory())
            .unwrap_or(&folder.path);
        println!(
            "{indent}  - {} ({})",
            relative.display(),
            folder.code_type.label()
        );
    }
    for child in tree.children(unit.id) {
        print_unit(tree, child, depth + 1);
    }
}

fn print_resolution(report: &ResolveReport) {
    for error in &report.errors {
        println!("warning: {error}");
    }
    println!(
        "working unit: {} ({})",
        report.working_unit,
        report.working_dir.display()
    );
    println!("targetClasses: {}", report.target_classes);
    println!("targetTests: {}", report.target_tests);
    println!("command: {}", report.command);
}
