use super::*;

mod form_validation;
mod page_binding;

const SIMULATOR_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>CPU Scheduler Simulator</title></head>
<body>
<form id="sim" method="post" enctype="multipart/form-data" novalidate>
  <div class="custom-file">
    <input type="file" class="custom-file-input" id="process_file" name="process_file">
    <label class="custom-file-label" for="process_file">Choose file...</label>
  </div>
  <div class="row">
    <div class="col-md-6 form-group">
      <label for="min_burst">Min burst <span data-toggle="tooltip" title="Shortest CPU burst">?</span></label>
      <input type="number" class="form-control" id="min_burst" name="min_burst" value="1">
    </div>
    <div class="col-md-6 form-group">
      <label for="max_burst">Max burst</label>
      <input type="number" class="form-control" id="max_burst" name="max_burst" value="10">
    </div>
  </div>
  <div class="row">
    <div class="col-md-6 form-group">
      <input type="number" class="form-control" id="min_arrival" name="min_arrival" value="0">
    </div>
    <div class="col-md-6 form-group">
      <input type="number" class="form-control" id="max_arrival" name="max_arrival" value="5">
    </div>
  </div>
  <div class="row">
    <div class="col-md-6 form-group">
      <input type="number" class="form-control" id="min_priority" name="min_priority" value="1">
    </div>
    <div class="col-md-6 form-group">
      <input type="number" class="form-control" id="max_priority" name="max_priority" value="5">
    </div>
  </div>
  <div class="row" id="algorithm-row">
    <div class="col form-group">
      <select class="form-control" id="algorithm" name="algorithm">
        <option value="fcfs" selected>FCFS</option>
        <option value="sjf">SJF</option>
        <option value="rr">Round Robin</option>
        <option value="priority">Priority</option>
        <option value="priority_rr">Priority Round Robin</option>
        <option value="all">Compare all</option>
      </select>
    </div>
  </div>
  <div class="row" id="quantum-row">
    <div class="col form-group">
      <label for="quantum">Time quantum</label>
      <input type="number" class="form-control" id="quantum" name="quantum" value="2" min="1">
    </div>
  </div>
  <button type="submit" class="btn btn-primary" id="run"
          data-toggle="popover" data-content="Runs the simulation">Run</button>
</form>

<table class="table sortable" id="results">
  <thead>
    <tr><th>Process</th><th>Burst</th><th>Arrival</th><th class="no-sort">Notes</th></tr>
  </thead>
  <tbody>
    <tr id="row-p1"><td>P1</td><td>10</td><td>0</td><td>first</td></tr>
    <tr id="row-p2"><td>P2</td><td>2</td><td>3</td><td>short</td></tr>
    <tr id="row-p3"><td>P3</td><td>33</td><td>1</td><td>long</td></tr>
  </tbody>
</table>

<table class="table" id="summary">
  <thead><tr><th>Metric</th></tr></thead>
  <tbody>
    <tr><td>waiting</td></tr>
    <tr><td>turnaround</td></tr>
  </tbody>
</table>
</body>
</html>
"#;

fn bound_simulator_page() -> Result<Page> {
    let mut page = Page::from_html(SIMULATOR_PAGE)?;
    page.bind()?;
    Ok(page)
}
