use donego_shared::view::{LIBRARY_PREVIEW, preview};
use donego_shared::{
    CategoryFilter, Checklist, Command, Segment, Stats, Task, Theme, ViewMode, highlight,
};
use web_sys::HtmlInputElement;
use yew::{
    Callback, Event, FocusEvent, Html, InputEvent, KeyboardEvent, MouseEvent, Properties,
    SubmitEvent, TargetCast, classes, function_component, html, use_state,
};

fn input_value(e: &InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

#[derive(Properties, PartialEq)]
pub struct HighlightedProps {
    pub text: String,
    pub query: String,
}

/// Wraps every search hit in `<mark>`.
#[function_component(Highlighted)]
pub fn highlighted(props: &HighlightedProps) -> Html {
    html! {
        <>
            {
                for highlight(&props.text, &props.query).into_iter().map(|segment| match segment {
                    Segment::Plain(text) => html! { { text.to_string() } },
                    Segment::Match(text) => html! { <mark>{ text.to_string() }</mark> },
                })
            }
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub stats: Stats,
    pub mode: ViewMode,
    pub theme: Theme,
    pub on_toggle_view: Callback<MouseEvent>,
    pub on_toggle_theme: Callback<MouseEvent>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let theme_label = match props.theme {
        Theme::Light => "Dark mode",
        Theme::Dark => "Light mode",
    };

    html! {
        <header class="header">
            <div class="brand">
                <h1>{ "DoneGo" }</h1>
                <span class="stats">
                    { format!("{} lists · {} tasks", props.stats.lists, props.stats.tasks) }
                </span>
            </div>
            <div class="actions">
                <button class="btn" onclick={props.on_toggle_view.clone()}>
                    { props.mode.toggle().label() }
                </button>
                <button class="btn ghost" onclick={props.on_toggle_theme.clone()}>
                    { theme_label }
                </button>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
pub struct OnboardingProps {
    pub on_dismiss: Callback<MouseEvent>,
}

#[function_component(Onboarding)]
pub fn onboarding(props: &OnboardingProps) -> Html {
    html! {
        <section class="panel tips">
            <ul>
                <li>{ "Create a checklist, add tasks and tick them off." }</li>
                <li>{ "Double-click a task to rename it." }</li>
                <li>{ "Reset a checklist to start over, or copy one from the library." }</li>
            </ul>
            <button class="btn ghost" onclick={props.on_dismiss.clone()}>{ "Got it" }</button>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct CreateFormProps {
    pub on_command: Callback<Command>,
}

#[function_component(CreateForm)]
pub fn create_form(props: &CreateFormProps) -> Html {
    let draft = use_state(String::new);

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| draft.set(input_value(&e)))
    };

    let on_submit = {
        let draft = draft.clone();
        let on_command = props.on_command.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_command.emit(Command::Create {
                title: (*draft).clone(),
            });
            draft.set(String::new());
        })
    };

    html! {
        <form class="panel create" onsubmit={on_submit}>
            <input
                placeholder="New checklist"
                value={(*draft).clone()}
                oninput={on_input}
            />
            <button class="btn" type="submit">{ "Create" }</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct SearchBarProps {
    pub query: String,
    pub on_query: Callback<String>,
}

#[function_component(SearchBar)]
pub fn search_bar(props: &SearchBarProps) -> Html {
    let on_input = {
        let on_query = props.on_query.clone();
        Callback::from(move |e: InputEvent| on_query.emit(input_value(&e)))
    };
    let on_clear = {
        let on_query = props.on_query.clone();
        Callback::from(move |_: MouseEvent| on_query.emit(String::new()))
    };

    html! {
        <div class="search">
            <input
                type="search"
                placeholder="Search titles and tasks"
                value={props.query.clone()}
                oninput={on_input}
            />
            if !props.query.is_empty() {
                <button class="btn ghost" onclick={on_clear}>{ "Clear" }</button>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CategoryChipsProps {
    pub chips: Vec<String>,
    pub selected: CategoryFilter,
    pub on_select: Callback<CategoryFilter>,
}

#[function_component(CategoryChips)]
pub fn category_chips(props: &CategoryChipsProps) -> Html {
    let on_reset = {
        let on_select = props.on_select.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(CategoryFilter::All))
    };

    html! {
        <nav class="chips">
            {
                for props.chips.iter().map(|chip| {
                    let active = props.selected.label() == chip;
                    let on_select = props.on_select.clone();
                    let filter = CategoryFilter::parse(chip);
                    html! {
                        <button
                            class={classes!("chip", active.then_some("active"))}
                            onclick={move |_| on_select.emit(filter.clone())}
                        >
                            { chip.clone() }
                        </button>
                    }
                })
            }
            if props.selected != CategoryFilter::All {
                <button class="chip reset" onclick={on_reset}>{ "Reset" }</button>
            }
        </nav>
    }
}

#[derive(Properties, PartialEq)]
pub struct ChecklistCardProps {
    pub checklist: Checklist,
    pub query: String,
    pub on_command: Callback<Command>,
}

#[function_component(ChecklistCard)]
pub fn checklist_card(props: &ChecklistCardProps) -> Html {
    let editing_title = use_state(|| false);
    let title_draft = use_state(String::new);
    let task_draft = use_state(String::new);
    let checklist_id = props.checklist.id.clone();

    let on_start_title = {
        let editing_title = editing_title.clone();
        let title_draft = title_draft.clone();
        let title = props.checklist.title.clone();
        Callback::from(move |_: MouseEvent| {
            title_draft.set(title.clone());
            editing_title.set(true);
        })
    };

    let commit_title = {
        let editing_title = editing_title.clone();
        let title_draft = title_draft.clone();
        let on_command = props.on_command.clone();
        let checklist = checklist_id.clone();
        move || {
            editing_title.set(false);
            on_command.emit(Command::EditTitle {
                checklist: checklist.clone(),
                title: (*title_draft).clone(),
            });
        }
    };

    let on_title_input = {
        let title_draft = title_draft.clone();
        Callback::from(move |e: InputEvent| title_draft.set(input_value(&e)))
    };

    let on_title_blur = {
        let commit_title = commit_title.clone();
        Callback::from(move |_: FocusEvent| commit_title())
    };

    let on_title_key = {
        let editing_title = editing_title.clone();
        Callback::from(move |e: KeyboardEvent| match e.key().as_str() {
            "Enter" => commit_title(),
            "Escape" => editing_title.set(false),
            _ => {}
        })
    };

    let on_task_input = {
        let task_draft = task_draft.clone();
        Callback::from(move |e: InputEvent| task_draft.set(input_value(&e)))
    };

    let on_add_task = {
        let task_draft = task_draft.clone();
        let on_command = props.on_command.clone();
        let checklist = checklist_id.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_command.emit(Command::AddTask {
                checklist: checklist.clone(),
                text: (*task_draft).clone(),
            });
            task_draft.set(String::new());
        })
    };

    let emit = |command: Command| {
        let on_command = props.on_command.clone();
        Callback::from(move |_: MouseEvent| on_command.emit(command.clone()))
    };
    let on_delete = emit(Command::Remove {
        checklist: checklist_id.clone(),
    });
    let on_reset = emit(Command::ResetTasks {
        checklist: checklist_id.clone(),
    });
    let on_clear = emit(Command::ClearCompleted {
        checklist: checklist_id.clone(),
    });

    let checklist = &props.checklist;
    let has_completed = checklist.has_completed();

    html! {
        <article class="panel card">
            <div class="card-head">
                if *editing_title {
                    <input
                        class="title-edit"
                        value={(*title_draft).clone()}
                        oninput={on_title_input}
                        onblur={on_title_blur}
                        onkeydown={on_title_key}
                    />
                } else {
                    <h3 onclick={on_start_title} title="Click to rename">
                        <Highlighted text={checklist.title.clone()} query={props.query.clone()} />
                    </h3>
                }
                <span class="meta">
                    { format!("{}/{}", checklist.done_count(), checklist.tasks.len()) }
                </span>
            </div>
            <form class="add-task" onsubmit={on_add_task}>
                <input
                    placeholder="Add a task"
                    value={(*task_draft).clone()}
                    oninput={on_task_input}
                />
                <button class="btn" type="submit">{ "Add" }</button>
            </form>
            <ul class="tasks">
                {
                    for checklist.tasks.iter().map(|task| html! {
                        <TaskRow
                            key={task.id.clone()}
                            checklist={checklist_id.clone()}
                            task={task.clone()}
                            query={props.query.clone()}
                            on_command={props.on_command.clone()}
                        />
                    })
                }
            </ul>
            <div class="card-actions">
                if has_completed {
                    <button class="btn ghost" onclick={on_reset}>{ "Reset" }</button>
                    <button class="btn ghost" onclick={on_clear}>{ "Clear completed" }</button>
                }
                <button class="btn danger" onclick={on_delete}>{ "Delete" }</button>
            </div>
        </article>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
    pub checklist: String,
    pub task: Task,
    pub query: String,
    pub on_command: Callback<Command>,
}

#[function_component(TaskRow)]
pub fn task_row(props: &TaskRowProps) -> Html {
    let editing = use_state(|| false);
    let draft = use_state(String::new);

    let on_toggle = {
        let on_command = props.on_command.clone();
        let command = Command::ToggleTask {
            checklist: props.checklist.clone(),
            task: props.task.id.clone(),
        };
        Callback::from(move |_: Event| on_command.emit(command.clone()))
    };

    let on_start_edit = {
        let editing = editing.clone();
        let draft = draft.clone();
        let text = props.task.text.clone();
        Callback::from(move |_: MouseEvent| {
            draft.set(text.clone());
            editing.set(true);
        })
    };

    let commit = {
        let editing = editing.clone();
        let draft = draft.clone();
        let on_command = props.on_command.clone();
        let checklist = props.checklist.clone();
        let task = props.task.id.clone();
        move || {
            editing.set(false);
            on_command.emit(Command::RenameTask {
                checklist: checklist.clone(),
                task: task.clone(),
                text: (*draft).clone(),
            });
        }
    };

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| draft.set(input_value(&e)))
    };

    let on_blur = {
        let commit = commit.clone();
        Callback::from(move |_: FocusEvent| commit())
    };

    let on_key = {
        let editing = editing.clone();
        Callback::from(move |e: KeyboardEvent| match e.key().as_str() {
            "Enter" => commit(),
            "Escape" => editing.set(false),
            _ => {}
        })
    };

    let on_delete = {
        let on_command = props.on_command.clone();
        let command = Command::RemoveTask {
            checklist: props.checklist.clone(),
            task: props.task.id.clone(),
        };
        Callback::from(move |_: MouseEvent| on_command.emit(command.clone()))
    };

    let task = &props.task;

    html! {
        <li class={classes!("task", task.done.then_some("done"))}>
            <input type="checkbox" checked={task.done} onchange={on_toggle} />
            if *editing {
                <input
                    class="task-edit"
                    value={(*draft).clone()}
                    oninput={on_input}
                    onblur={on_blur}
                    onkeydown={on_key}
                />
            } else {
                <span class="text" ondblclick={on_start_edit}>
                    <Highlighted text={task.text.clone()} query={props.query.clone()} />
                </span>
            }
            <button class="btn icon" onclick={on_delete} title="Delete task">{ "×" }</button>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct LibraryCardProps {
    pub entry: Checklist,
    pub query: String,
    pub on_command: Callback<Command>,
}

#[function_component(LibraryCard)]
pub fn library_card(props: &LibraryCardProps) -> Html {
    let on_copy = {
        let on_command = props.on_command.clone();
        let library = props.entry.id.clone();
        Callback::from(move |_: MouseEvent| {
            on_command.emit(Command::CopyFromLibrary {
                library: library.clone(),
            })
        })
    };

    let entry = &props.entry;
    let cut = preview(entry, LIBRARY_PREVIEW);

    html! {
        <article class="panel card library">
            <div class="card-head">
                <h3><Highlighted text={entry.title.clone()} query={props.query.clone()} /></h3>
                <span class="badge">{ entry.category_or_default().to_string() }</span>
            </div>
            <ul class="tasks preview">
                {
                    for cut.shown.iter().map(|task| html! {
                        <li class="task">
                            <Highlighted text={task.text.clone()} query={props.query.clone()} />
                        </li>
                    })
                }
            </ul>
            if let Some(label) = cut.remaining_label() {
                <p class="more">{ label }</p>
            }
            <button class="btn" onclick={on_copy}>{ "Copy to my lists" }</button>
        </article>
    }
}
