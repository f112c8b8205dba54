use std::io;

use anyhow::{Context, anyhow};
use donego_shared::persist::encode_store;
use donego_shared::view::{ViewState, categories};
use donego_shared::{
    CategoryFilter, Checklist, Command, Effect, KeyValueStore, Persistence, Store, Task, Theme,
    TimestampIds, Transition, ViewMode, reduce,
};
use tracing::{debug, info, instrument, trace};

use crate::cli::Invocation;
use crate::config::Config;
use crate::confirm::Confirm;
use crate::render::Renderer;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "list",
        "library",
        "show",
        "new",
        "delete",
        "title",
        "add",
        "toggle",
        "rename",
        "remove",
        "reset",
        "clear",
        "copy",
        "categories",
        "stats",
        "theme",
        "tips",
        "export",
        "help",
        "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

/// Everything one command needs: the slot storage, settings, output and
/// the confirmation prompt.
pub struct Session<'a, S, C> {
    pub persistence: &'a mut Persistence<S>,
    pub cfg: &'a Config,
    pub renderer: &'a Renderer,
    pub confirm: &'a mut C,
}

#[instrument(skip(ctx, inv), fields(command = %inv.command))]
pub fn dispatch<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    inv: Invocation,
) -> anyhow::Result<()> {
    let store = ctx.persistence.load_store();
    let args = inv.args.as_slice();

    debug!(args = ?args, lists = store.my_lists.len(), "dispatching command");

    match inv.command.as_str() {
        "list" => cmd_list(ctx, &store, ViewMode::Mine, args),
        "library" => cmd_list(ctx, &store, ViewMode::Library, args),
        "show" => cmd_show(ctx, &store, args),
        "new" => cmd_new(ctx, &store, args),
        "delete" => cmd_delete(ctx, &store, args),
        "title" => cmd_title(ctx, &store, args),
        "add" => cmd_add(ctx, &store, args),
        "toggle" => cmd_toggle(ctx, &store, args),
        "rename" => cmd_rename(ctx, &store, args),
        "remove" => cmd_remove(ctx, &store, args),
        "reset" => cmd_reset(ctx, &store, args),
        "clear" => cmd_clear(ctx, &store, args),
        "copy" => cmd_copy(ctx, &store, args),
        "categories" => cmd_categories(ctx, &store, args),
        "stats" => ctx.renderer.write_stats(io::stdout().lock(), store.stats()),
        "theme" => cmd_theme(ctx, args),
        "tips" => cmd_tips(ctx, args),
        "export" => cmd_export(&store),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(ctx, store, args))]
fn cmd_list<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    mode: ViewMode,
    args: &[String],
) -> anyhow::Result<()> {
    info!(mode = mode.as_key(), "command list");

    let view = parse_view_args(mode, args)?;
    match mode {
        ViewMode::Mine => {
            if !ctx.persistence.onboarding_dismissed() {
                ctx.renderer.write_tips(io::stdout().lock())?;
                println!();
            }
            let lists: Vec<(usize, &Checklist)> = store
                .my_lists
                .iter()
                .enumerate()
                .filter(|(_, checklist)| view.matches(checklist))
                .map(|(idx, checklist)| (idx + 1, checklist))
                .collect();
            ctx.renderer
                .print_checklists(&lists, &view.query, mode.empty_message())
        }
        ViewMode::Library => ctx.renderer.print_library(&view.visible(store), &view.query),
    }
}

#[instrument(skip(ctx, store, args))]
fn cmd_show<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command show");
    let token = required(args, 0, "show requires a LIST")?;
    let (position, checklist) = resolve_list(store, token)?;
    ctx.renderer.print_checklist(position, checklist, "")
}

#[instrument(skip(ctx, store, args))]
fn cmd_new<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command new");
    let title = join_text(args, 0, "new requires a TITLE")?;

    let Some(transition) = apply(ctx, store, Command::Create { title })? else {
        return Ok(());
    };
    if let Some(created) = transition.store.my_lists.first() {
        println!("Created checklist 1 \"{}\" ({}).", created.title, created.id);
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_delete<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command delete");
    let (_, checklist) = resolve_list(store, required(args, 0, "delete requires a LIST")?)?;
    let title = checklist.title.clone();

    let command = Command::Remove {
        checklist: checklist.id.clone(),
    };
    if apply(ctx, store, command)?.is_some() {
        println!("Deleted checklist \"{title}\".");
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_title<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command title");
    let (_, checklist) = resolve_list(store, required(args, 0, "title requires a LIST")?)?;
    let title = join_text(args, 1, "title requires a new TITLE")?;

    let command = Command::EditTitle {
        checklist: checklist.id.clone(),
        title,
    };
    if let Some(transition) = apply(ctx, store, command)?
        && let Some(updated) = transition.store.checklist(&checklist.id)
    {
        println!("Renamed checklist to \"{}\".", updated.title);
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_add<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command add");
    let (_, checklist) = resolve_list(store, required(args, 0, "add requires a LIST")?)?;
    let text = join_text(args, 1, "add requires task TEXT")?;

    let command = Command::AddTask {
        checklist: checklist.id.clone(),
        text,
    };
    if let Some(transition) = apply(ctx, store, command)?
        && let Some(updated) = transition.store.checklist(&checklist.id)
        && let Some(task) = updated.tasks.first()
    {
        println!("Added \"{}\" to \"{}\".", task.text, updated.title);
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_toggle<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command toggle");
    let (checklist, task) = resolve_list_and_task(store, args, "toggle")?;

    let command = Command::ToggleTask {
        checklist: checklist.id.clone(),
        task: task.id.clone(),
    };
    if let Some(transition) = apply(ctx, store, command)?
        && let Some(updated) = transition
            .store
            .checklist(&checklist.id)
            .and_then(|checklist| checklist.task(&task.id))
    {
        let verb = if updated.done { "Checked" } else { "Unchecked" };
        println!("{verb} \"{}\".", updated.text);
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_rename<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command rename");
    let (checklist, task) = resolve_list_and_task(store, args, "rename")?;
    let text = join_text(args, 2, "rename requires new task TEXT")?;

    let command = Command::RenameTask {
        checklist: checklist.id.clone(),
        task: task.id.clone(),
        text,
    };
    if let Some(transition) = apply(ctx, store, command)?
        && let Some(updated) = transition
            .store
            .checklist(&checklist.id)
            .and_then(|checklist| checklist.task(&task.id))
    {
        println!("Renamed task to \"{}\".", updated.text);
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_remove<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command remove");
    let (checklist, task) = resolve_list_and_task(store, args, "remove")?;

    let command = Command::RemoveTask {
        checklist: checklist.id.clone(),
        task: task.id.clone(),
    };
    if apply(ctx, store, command)?.is_some() {
        println!("Deleted task \"{}\".", task.text);
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_reset<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command reset");
    let (_, checklist) = resolve_list(store, required(args, 0, "reset requires a LIST")?)?;

    let command = Command::ResetTasks {
        checklist: checklist.id.clone(),
    };
    if apply(ctx, store, command)?.is_some() {
        println!("Unchecked every task in \"{}\".", checklist.title);
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_clear<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command clear");
    let (_, checklist) = resolve_list(store, required(args, 0, "clear requires a LIST")?)?;
    let removed = checklist.done_count();

    let command = Command::ClearCompleted {
        checklist: checklist.id.clone(),
    };
    if apply(ctx, store, command)?.is_some() {
        let noun = if removed == 1 { "task" } else { "tasks" };
        println!(
            "Removed {removed} completed {noun} from \"{}\".",
            checklist.title
        );
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_copy<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command copy");
    let token = required(args, 0, "copy requires a LIBRARY_ID")?;
    let (_, entry) = resolve(&store.library, token, |entry| entry.id.as_str(), "library entry")?;

    let command = Command::CopyFromLibrary {
        library: entry.id.clone(),
    };
    let Some(transition) = apply(ctx, store, command)? else {
        return Ok(());
    };
    println!("Copied \"{}\" into your lists.", entry.title);

    if transition.effects.contains(&Effect::ShowView(ViewMode::Mine)) {
        println!();
        let lists: Vec<(usize, &Checklist)> = transition
            .store
            .my_lists
            .iter()
            .enumerate()
            .map(|(idx, checklist)| (idx + 1, checklist))
            .collect();
        ctx.renderer
            .print_checklists(&lists, "", ViewMode::Mine.empty_message())?;
    }
    Ok(())
}

#[instrument(skip(ctx, store, args))]
fn cmd_categories<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    args: &[String],
) -> anyhow::Result<()> {
    let mode = match args.first().map(String::as_str) {
        None | Some("mine") => ViewMode::Mine,
        Some("library") => ViewMode::Library,
        Some(other) => return Err(anyhow!("unknown view: {other} (expected mine or library)")),
    };
    ctx.renderer
        .write_categories(io::stdout().lock(), &categories(store, mode))
}

#[instrument(skip(ctx, args))]
fn cmd_theme<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    args: &[String],
) -> anyhow::Result<()> {
    info!("command theme");
    let current = match ctx.persistence.stored_theme() {
        Some(theme) => theme,
        None => ctx.cfg.default_theme()?,
    };

    let next = match args.first().map(String::as_str) {
        None => current,
        Some("toggle") => current.toggle(),
        Some(raw) => Theme::parse(raw)
            .ok_or_else(|| anyhow!("unknown theme: {raw} (expected light, dark or toggle)"))?,
    };

    if !args.is_empty() {
        ctx.persistence.save_theme(next);
        debug!(theme = next.as_str(), "theme saved");
    }
    ctx.renderer.write_theme(io::stdout().lock(), next)
}

#[instrument(skip(ctx, args))]
fn cmd_tips<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    args: &[String],
) -> anyhow::Result<()> {
    match args.first().map(String::as_str) {
        None => ctx.renderer.write_tips(io::stdout().lock()),
        Some("dismiss") => {
            ctx.persistence.dismiss_onboarding();
            println!("Tips dismissed.");
            Ok(())
        }
        Some(other) => Err(anyhow!("unknown tips action: {other} (expected dismiss)")),
    }
}

fn cmd_export(store: &Store) -> anyhow::Result<()> {
    println!("{}", encode_store(store)?);
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Usage: donego [OPTIONS] <command> [args]\n\n\
         Commands (any unique prefix works):\n  \
         list [-q TEXT] [-c CATEGORY]     show your checklists\n  \
         library [-q TEXT] [-c CATEGORY]  browse the built-in library\n  \
         show LIST                        show one checklist with its tasks\n  \
         new TITLE                        create a checklist\n  \
         delete LIST                      delete a checklist\n  \
         title LIST TITLE                 rename a checklist\n  \
         add LIST TEXT                    add a task\n  \
         toggle LIST TASK                 check or uncheck a task\n  \
         rename LIST TASK TEXT            edit a task\n  \
         remove LIST TASK                 delete a task\n  \
         reset LIST                       uncheck every task\n  \
         clear LIST                       delete completed tasks\n  \
         copy LIBRARY_ID                  copy a library checklist into your lists\n  \
         categories [mine|library]        list category filters\n  \
         stats                            count lists and tasks\n  \
         theme [light|dark|toggle]        show or set the theme\n  \
         tips [dismiss]                   show or hide the tips\n  \
         export                           print the saved state as JSON\n\n\
         LIST and TASK are a position (1, 2, ...), an id or a unique id prefix."
    );
    Ok(())
}

/// Confirms when needed, reduces, persists a changed store and performs the
/// resulting effects. `None` means the user declined.
fn apply<S: KeyValueStore, C: Confirm>(
    ctx: &mut Session<'_, S, C>,
    store: &Store,
    command: Command,
) -> anyhow::Result<Option<Transition>> {
    if let Some(prompt) = command.confirmation_prompt()
        && !ctx.confirm.confirm(prompt)?
    {
        info!(command = command.name(), "declined by user");
        println!("Aborted.");
        return Ok(None);
    }

    let transition = reduce(store, &command, &mut TimestampIds);
    if !transition.changed {
        println!("Nothing changed.");
        return Ok(None);
    }

    ctx.persistence.save_store(&transition.store);
    for effect in &transition.effects {
        match effect {
            Effect::Track(event) => info!(event = event.name(), "track"),
            Effect::Haptic => trace!("haptic feedback not available in a terminal"),
            Effect::ShowView(mode) => debug!(view = mode.as_key(), "switching view"),
        }
    }
    Ok(Some(transition))
}

fn parse_view_args(mode: ViewMode, args: &[String]) -> anyhow::Result<ViewState> {
    let mut view = ViewState::new(mode);
    let mut terms = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-q" | "--query" => {
                let value = iter
                    .next()
                    .with_context(|| format!("{arg} requires a value"))?;
                terms.push(value.clone());
            }
            "-c" | "--category" => {
                let value = iter
                    .next()
                    .with_context(|| format!("{arg} requires a value"))?;
                view.category = CategoryFilter::parse(value);
            }
            other if other.starts_with('-') => {
                return Err(anyhow!("unknown option: {other}"));
            }
            other => terms.push(other.to_string()),
        }
    }

    view.query = terms.join(" ");
    Ok(view)
}

fn required<'a>(args: &'a [String], idx: usize, message: &str) -> anyhow::Result<&'a str> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{message}"))
}

fn join_text(args: &[String], from: usize, message: &str) -> anyhow::Result<String> {
    match args.get(from..) {
        Some(rest) if !rest.is_empty() => Ok(rest.join(" ")),
        _ => Err(anyhow!("{message}")),
    }
}

/// Resolves a 1-based position, an exact id or a unique id prefix.
fn resolve<'a, T>(
    items: &'a [T],
    token: &str,
    id_of: impl Fn(&T) -> &str,
    kind: &str,
) -> anyhow::Result<(usize, &'a T)> {
    if let Ok(position) = token.parse::<usize>()
        && position >= 1
        && let Some(item) = items.get(position - 1)
    {
        return Ok((position, item));
    }

    if let Some((idx, item)) = items.iter().enumerate().find(|(_, item)| id_of(item) == token) {
        return Ok((idx + 1, item));
    }

    let mut prefixed = items
        .iter()
        .enumerate()
        .filter(|(_, item)| id_of(item).starts_with(token));
    match (prefixed.next(), prefixed.next()) {
        (Some((idx, item)), None) if !token.is_empty() => Ok((idx + 1, item)),
        (Some(_), Some(_)) => Err(anyhow!("{kind} id prefix {token} is ambiguous")),
        _ => Err(anyhow!("no {kind} matches {token}")),
    }
}

fn resolve_list<'a>(store: &'a Store, token: &str) -> anyhow::Result<(usize, &'a Checklist)> {
    resolve(&store.my_lists, token, |checklist| checklist.id.as_str(), "checklist")
}

fn resolve_list_and_task<'a>(
    store: &'a Store,
    args: &[String],
    command: &str,
) -> anyhow::Result<(&'a Checklist, &'a Task)> {
    let list_token = required(args, 0, &format!("{command} requires a LIST"))?;
    let task_token = required(args, 1, &format!("{command} requires a TASK"))?;
    let (_, checklist) = resolve_list(store, list_token)?;
    let (_, task) = resolve(&checklist.tasks, task_token, |task| task.id.as_str(), "task")
        .with_context(|| format!("in checklist \"{}\"", checklist.title))?;
    Ok((checklist, task))
}
