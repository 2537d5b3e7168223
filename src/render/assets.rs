/// Embedded style and scripts of the generated SVG documents

pub const STYLE: &str = r#"line { stroke:black;}
circle { stroke:black; stroke-width: 2}
circle.main { stroke:#F00; stroke-width: 3}
.dep, .req, .reqdep { stroke-width:0; }
.async { stroke-dasharray: 4 4; stroke-linecap: round}
.reqdep.hover { stroke:#660; stroke-width: 3; }
.req.hover { stroke:red; stroke-width: 3; }
.dep.hover { stroke:green; stroke-width: 3; }
circle.hover { stroke:blue; stroke-width: 2; }"#;

/// Hover highlighting and colour switching. `a(node, links)` highlights a
/// module and its hover lines, `c()` clears every highlight.
pub const HOVER_SCRIPT: &str = r#"function addHover(node) {
    node.setAttribute("class", node.getAttribute("class") + " hover");
}
function removeHover(node) {
    var className = node.getAttribute("class").split(" ");
    className.splice(className.indexOf("hover"), 1);
    node.setAttribute("class", className.join(" "));
}
function setColor(node, number) {
    node.setAttribute("fill", node.getAttribute("fill" + number));
}
function setColors(number) {
    var elements = document.getElementsByClassName("module");
    for (var i = 0; i < elements.length; i++) setColor(elements[i], number);
}
function a(node, links) {
    addHover(document.getElementById("module" + node));
    for (var i = 0; i < links; i++) {
        var link = document.getElementById("module" + node + "link" + i);
        if (link) addHover(link);
    }
}
function c() {
    var elements = Array.prototype.slice.call(document.getElementsByClassName("hover"));
    for (var i = 0; i < elements.length; i++) removeHover(elements[i]);
}"#;

/// Live mode client. Polls the server for frames, applies the geometry by
/// element id and forwards drags and key presses. Opened from disk it stays
/// inert; the embedded snapshot can be resumed with `--from-snapshot`.
pub const LIVE_SCRIPT: &str = r#"(function () {
    if (!/^https?:$/.test(location.protocol)) return;
    var root = document.getElementById("wpgraph");
    var paused = false;
    var dragging = null;
    var pending = false;

    function post(method, url, body) {
        return fetch(url, {
            method: method,
            headers: { "Content-Type": "application/json" },
            body: body === undefined ? undefined : JSON.stringify(body)
        });
    }

    function apply(frame) {
        root.setAttribute("width", "" + frame.width);
        root.setAttribute("height", "" + frame.height);
        frame.circles.forEach(function (c) {
            var el = document.getElementById(c.id);
            if (!el) return;
            el.setAttribute("cx", "" + c.cx);
            el.setAttribute("cy", "" + c.cy);
            el.setAttribute("r", "" + c.r);
        });
        frame.lines.forEach(function (l) {
            var el = document.getElementById(l.id);
            if (!el) return;
            el.setAttribute("x1", "" + l.x1);
            el.setAttribute("y1", "" + l.y1);
            el.setAttribute("x2", "" + l.x2);
            el.setAttribute("y2", "" + l.y2);
        });
    }

    function poll() {
        if (pending) return;
        pending = true;
        fetch("/api/frame")
            .then(function (response) { return response.json(); })
            .then(apply)
            .catch(function () {})
            .then(function () { pending = false; });
    }

    function pointer(evt) {
        var point = root.createSVGPoint();
        point.x = evt.clientX;
        point.y = evt.clientY;
        return point.matrixTransform(root.getScreenCTM().inverse());
    }

    root.addEventListener("mousedown", function (evt) {
        var match = /^module(\d+)$/.exec(evt.target.id || "");
        if (!match) return;
        dragging = parseInt(match[1], 10);
        evt.preventDefault();
    });
    root.addEventListener("mousemove", function (evt) {
        if (dragging === null) return;
        var p = pointer(evt);
        post("POST", "/api/drag", { node: dragging, x: p.x, y: p.y });
    });
    window.addEventListener("mouseup", function () {
        if (dragging === null) return;
        dragging = null;
        post("DELETE", "/api/drag");
    });
    window.addEventListener("keydown", function (evt) {
        if (evt.key === " ") {
            paused = !paused;
            post("POST", "/api/control", { action: paused ? "pause" : "resume" });
            evt.preventDefault();
        } else if (evt.key === "s") {
            paused = true;
            post("POST", "/api/control", { action: "step" });
        }
    });

    setInterval(poll, 50);
})();"#;
