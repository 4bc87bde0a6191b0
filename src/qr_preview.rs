use yew::prelude::*;

pub struct QrPreview {
    props: Props,
    container: NodeRef,
}

#[derive(Properties, Clone, PartialEq)]
pub struct Props {
    /// Rendered code, `None` while there is nothing to encode.
    #[prop_or_default]
    pub svg: Option<String>,
    #[prop_or_default]
    pub error: Option<String>,
    pub background: String,
}

impl Component for QrPreview {
    type Message = ();
    type Properties = Props;

    fn create(props: Self::Properties, _link: ComponentLink<Self>) -> Self {
        Self {
            props,
            container: NodeRef::default(),
        }
    }

    fn update(&mut self, _msg: Self::Message) -> ShouldRender {
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

    fn rendered(&mut self, _first_render: bool) {
        if let Some(svg) = &self.props.svg {
            if let Some(container) = self.container.cast::<web_sys::Element>() {
                container.set_inner_html(svg);
            }
        }
    }

    fn view(&self) -> Html {
        if let Some(error) = &self.props.error {
            return html! {
                <div class="preview preview-error">
                    <h3>{ "Cannot render this code" }</h3>
                    <p>{ error }</p>
                </div>
            };
        }

        if self.props.svg.is_none() {
            return html! {
                <div class="preview preview-empty">
                    <h3>{ "Awaiting Input" }</h3>
                    <p>{ "Enter a URL or text to generate your QR code" }</p>
                </div>
            };
        }

        html! {
            <div
                class="preview"
                style={ format!("background: {}", self.props.background) }
                ref=self.container.clone()>
            </div>
        }
    }
}
