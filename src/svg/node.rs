//! SVG element tree and serializer.

/// One SVG element. Attribute order is preserved as inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
    pub text: Option<String>,
}

impl SvgNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn child(mut self, child: SvgNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = SvgNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Serialize to markup. Compact output, no inter-element whitespace.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Group element with the given attributes.
pub fn g(attrs: &[(&str, &str)]) -> SvgNode {
    let mut node = SvgNode::new("g");
    for (name, value) in attrs {
        node = node.attr(name, *value);
    }
    node
}

/// Childless element with the given attributes.
pub fn leaf(name: &str, attrs: &[(&str, &str)]) -> SvgNode {
    let mut node = SvgNode::new(name);
    for (k, v) in attrs {
        node = node.attr(k, *v);
    }
    node
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_elements() {
        let node = SvgNode::new("svg")
            .attr("width", "10")
            .child(leaf("rect", &[("x", "0"), ("fill", "white")]))
            .child(g(&[("transform", "matrix(1 0 0 -1 0 100)")]).child(leaf("path", &[])));
        assert_eq!(
            node.render(),
            "<svg width=\"10\"><rect x=\"0\" fill=\"white\"/>\
             <g transform=\"matrix(1 0 0 -1 0 100)\"><path/></g></svg>"
        );
    }

    #[test]
    fn escapes_text_and_attrs() {
        let node = SvgNode::new("text").attr("data-v", "a<b").text("x & y");
        assert_eq!(node.render(), "<text data-v=\"a&lt;b\">x &amp; y</text>");
    }
}
