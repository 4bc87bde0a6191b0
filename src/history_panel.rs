use yew::prelude::*;

use crate::payload::encode;
use crate::types::HistoryItem;

const SUMMARY_CHARS: usize = 48;

pub struct HistoryPanel {
    link: ComponentLink<Self>,
    props: Props,
}

pub enum Msg {
    Rename(String, String),
    Ignore,
}

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    pub items: Vec<HistoryItem>,
    pub onrestore: Callback<String>,
    pub onrename: Callback<(String, String)>,
    pub ondelete: Callback<String>,
    pub onclear: Callback<()>,
}

/// Only text edits rename; other change events are dropped.
fn rename_msg(id: String, change: ChangeData) -> Msg {
    match change {
        ChangeData::Value(name) => Msg::Rename(id, name),
        _ => Msg::Ignore,
    }
}

impl HistoryPanel {
    fn view_item(&self, item: &HistoryItem) -> Html {
        let restore = {
            let id = item.id.clone();
            self.props.onrestore.reform(move |_| id.clone())
        };
        let delete = {
            let id = item.id.clone();
            self.props.ondelete.reform(move |_| id.clone())
        };
        let rename = {
            let id = item.id.clone();
            self.link
                .callback(move |change: ChangeData| rename_msg(id.clone(), change))
        };

        let payload = encode(&item.record);
        let mut summary: String = payload.chars().take(SUMMARY_CHARS).collect();
        if summary.len() < payload.len() {
            summary.push('…');
        }

        html! {
            <li class="history-item">
                <input class="history-name" type="text" value=item.name.clone() onchange=rename />
                <span class="history-type">{ item.record.kind.label() }</span>
                <span class="history-date">{ item.created_label() }</span>
                <code class="history-payload">{ summary }</code>
                <button onclick=restore class="mdi-set mdi-restore" title="Restore configuration"></button>
                <button onclick=delete class="mdi-set mdi-delete-outline" title="Delete"></button>
            </li>
        }
    }
}

impl Component for HistoryPanel {
    type Message = Msg;
    type Properties = Props;

    fn create(props: Self::Properties, link: ComponentLink<Self>) -> Self {
        Self { link, props }
    }

    fn update(&mut self, msg: Self::Message) -> ShouldRender {
        if let Msg::Rename(id, name) = msg {
            self.props.onrename.emit((id, name));
        }
        false
    }

    fn change(&mut self, props: Self::Properties) -> ShouldRender {
        if self.props != props {
            self.props = props;
            true
        } else {
            false
        }
    }

    fn view(&self) -> Html {
        if self.props.items.is_empty() {
            return html! {
                <section class="history history-empty">
                    <p>{ "Empty Workspace" }</p>
                    <p>{ "Your saved codes will appear here." }</p>
                </section>
            };
        }

        html! {
            <section class="history">
                <header>
                    <h2>{ "Saved Artifacts" }</h2>
                    <span class="history-count">{ format!("{} ITEMS", self.props.items.len()) }</span>
                    <button onclick=self.props.onclear.reform(|_| ()) class="mdi-set mdi-delete-sweep" title="Clear history"></button>
                </header>
                <ul>
                    { for self.props.items.iter().map(|item| self.view_item(item)) }
                </ul>
            </section>
        }
    }
}
